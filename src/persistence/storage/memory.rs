use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    consts::consts::PersonId,
    model::person::{Person, PersonData},
};

use super::{PersonStorage, StorageResult};

const START_AT_ID: PersonId = PersonId(1);

#[derive(Debug)]
struct PersonTable {
    rows: BTreeMap<PersonId, PersonData>,
    next_id: PersonId,
}

/// In process persons table. Ids are handed out from a counter that never goes back,
/// like an auto increment column, so deleted ids are not reused
#[derive(Debug)]
pub struct MemoryStorage {
    table: RwLock<PersonTable>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PersonTable {
                rows: BTreeMap::new(),
                next_id: START_AT_ID,
            }),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonStorage for MemoryStorage {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Person>> {
        let table = self.table.read().await;

        // BTreeMap iterates in key order, which is ascending id
        let people = table
            .rows
            .iter()
            .map(|(id, data)| Person::from_data(*id, data.clone()))
            .collect();

        Ok(people)
    }

    async fn get(&self, id: PersonId) -> StorageResult<Option<Person>> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .get(&id)
            .map(|data| Person::from_data(id, data.clone())))
    }

    async fn insert(&self, data: &PersonData) -> StorageResult<PersonId> {
        let mut table = self.table.write().await;

        let id = table.next_id;
        table.next_id = id.increment();
        table.rows.insert(id, data.clone());

        Ok(id)
    }

    async fn update(&self, id: PersonId, data: &PersonData) -> StorageResult<u64> {
        let mut table = self.table.write().await;

        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = data.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: PersonId) -> StorageResult<u64> {
        let mut table = self.table.write().await;

        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
