use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    consts::consts::PersonId,
    database::options::{DatabaseOptions, DatabaseOptionsError},
    model::person::{Person, PersonData},
};

use self::{memory::MemoryStorage, postgres::PgStorage};

pub mod memory;
pub mod postgres;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage configuration: {0}")]
    InvalidConfiguration(#[from] DatabaseOptionsError),
    #[error("Unable to connect to storage: {0}")]
    UnableToConnect(anyhow::Error),
    #[error("Unable to initialize schema: {0}")]
    UnableToInitializeSchema(anyhow::Error),
    #[error("Unable to query persons: {0}")]
    UnableToQuery(anyhow::Error),
    #[error("Unable to write person: {0}")]
    UnableToWrite(anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Where the persons table lives. Every method is a single statement against the backend,
/// mutations report how many rows they touched so callers can tell a missing row apart
#[async_trait]
pub trait PersonStorage: Send + Sync {
    /// Creates the persons table if it does not exist yet
    async fn init(&self) -> StorageResult<()>;

    /// Every person, ordered by ascending id
    async fn list(&self) -> StorageResult<Vec<Person>>;

    async fn get(&self, id: PersonId) -> StorageResult<Option<Person>>;

    /// Returns the id assigned by the backend
    async fn insert(&self, data: &PersonData) -> StorageResult<PersonId>;

    /// Replaces name, email and phone, returns the affected row count
    async fn update(&self, id: PersonId, data: &PersonData) -> StorageResult<u64>;

    /// Returns the affected row count
    async fn delete(&self, id: PersonId) -> StorageResult<u64>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub enum StorageEngine {
    Postgres(DatabaseOptions),
    /// Not durable, everything is lost when the process exits
    Memory,
}

impl StorageEngine {
    /// Opens the backend and checks it is reachable, the returned storage is ready to be initialized
    pub async fn connect(self) -> StorageResult<Arc<dyn PersonStorage>> {
        match self {
            StorageEngine::Postgres(options) => {
                let config = options.to_pg_config()?;
                let storage = PgStorage::connect(&config).await?;

                Ok(Arc::new(storage))
            }
            StorageEngine::Memory => Ok(Arc::new(MemoryStorage::new())),
        }
    }
}
