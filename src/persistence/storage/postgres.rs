use anyhow::anyhow;
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{Config, NoTls, Row};

use crate::{
    consts::consts::PersonId,
    model::person::{Person, PersonData},
};

use super::{PersonStorage, StorageError, StorageResult};

// `updated_at` is touched by a trigger so the service never has to send it
const CREATE_PERSONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS persons (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        phone TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE OR REPLACE FUNCTION persons_touch_updated_at() RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = CURRENT_TIMESTAMP;
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql;

    DROP TRIGGER IF EXISTS persons_touch_updated_at ON persons;

    CREATE TRIGGER persons_touch_updated_at
        BEFORE UPDATE ON persons
        FOR EACH ROW EXECUTE FUNCTION persons_touch_updated_at();
"#;

const SELECT_PERSONS: &str = "SELECT id, name, email, phone FROM persons ORDER BY id";
const SELECT_PERSON: &str = "SELECT id, name, email, phone FROM persons WHERE id = $1";
const INSERT_PERSON: &str = "INSERT INTO persons (name, email, phone) VALUES ($1, $2, $3) RETURNING id";
const UPDATE_PERSON: &str = "UPDATE persons SET name = $1, email = $2, phone = $3 WHERE id = $4";
const DELETE_PERSON: &str = "DELETE FROM persons WHERE id = $1";

/// Persons table in postgres, statements run on connections checked out of a pool.
/// Connections are verified before reuse, a closed one is dropped and replaced
pub struct PgStorage {
    pool: Pool,
}

impl PgStorage {
    /// Builds the pool and checks the server once through it, failing when it is unreachable
    pub async fn connect(config: &Config) -> StorageResult<Self> {
        let manager = Manager::from_config(
            config.clone(),
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Verified,
            },
        );

        let pool = Pool::builder(manager)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StorageError::UnableToConnect(anyhow!(e)))?;

        let storage = Self { pool };

        storage
            .client()
            .await?
            .simple_query("SELECT 1")
            .await
            .map_err(|e| StorageError::UnableToConnect(anyhow!(e)))?;

        Ok(storage)
    }

    async fn client(&self) -> StorageResult<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::UnableToConnect(anyhow!(e)))
    }
}

fn person_from_row(row: &Row) -> Result<Person, tokio_postgres::Error> {
    Ok(Person {
        id: PersonId(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
    })
}

#[async_trait]
impl PersonStorage for PgStorage {
    #[tracing::instrument(skip(self))]
    async fn init(&self) -> StorageResult<()> {
        self.client()
            .await?
            .batch_execute(CREATE_PERSONS_TABLE)
            .await
            .map_err(|e| StorageError::UnableToInitializeSchema(anyhow!(e)))
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> StorageResult<Vec<Person>> {
        let rows = self
            .client()
            .await?
            .query(SELECT_PERSONS, &[])
            .await
            .map_err(|e| StorageError::UnableToQuery(anyhow!(e)))?;

        rows.iter()
            .map(person_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::UnableToQuery(anyhow!(e)))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: PersonId) -> StorageResult<Option<Person>> {
        let row = self
            .client()
            .await?
            .query_opt(SELECT_PERSON, &[&id.to_number()])
            .await
            .map_err(|e| StorageError::UnableToQuery(anyhow!(e)))?;

        match row {
            Some(row) => person_from_row(&row)
                .map(Some)
                .map_err(|e| StorageError::UnableToQuery(anyhow!(e))),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, data))]
    async fn insert(&self, data: &PersonData) -> StorageResult<PersonId> {
        let row = self
            .client()
            .await?
            .query_one(INSERT_PERSON, &[&data.name, &data.email, &data.phone])
            .await
            .map_err(|e| StorageError::UnableToWrite(anyhow!(e)))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StorageError::UnableToWrite(anyhow!(e)))?;

        Ok(PersonId(id))
    }

    #[tracing::instrument(skip(self, data))]
    async fn update(&self, id: PersonId, data: &PersonData) -> StorageResult<u64> {
        self.client()
            .await?
            .execute(
                UPDATE_PERSON,
                &[&data.name, &data.email, &data.phone, &id.to_number()],
            )
            .await
            .map_err(|e| StorageError::UnableToWrite(anyhow!(e)))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: PersonId) -> StorageResult<u64> {
        self.client()
            .await?
            .execute(DELETE_PERSON, &[&id.to_number()])
            .await
            .map_err(|e| StorageError::UnableToWrite(anyhow!(e)))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
