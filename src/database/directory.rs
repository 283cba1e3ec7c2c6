use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::{
    consts::consts::{PersonId, PersonIdError, HEALTH_STATUS_OK, SERVICE_NAME},
    model::person::{Person, PersonData},
    persistence::storage::{PersonStorage, StorageError},
};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Person not found: [id: {0}]")]
    NotFound(PersonId),
    #[error("Failed to {action}")]
    StorageUnavailable {
        action: &'static str,
        #[source]
        source: StorageError,
    },
}

impl From<PersonIdError> for DirectoryError {
    fn from(e: PersonIdError) -> Self {
        log::debug!("Rejected person id: {}", e);
        DirectoryError::InvalidArgument("Invalid ID".to_string())
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

/// Goal of the directory is to provide the CRUD operations over people, independent of the transport
///
/// Each operation is one statement against storage:
/// 1. Inputs are validated before storage is touched, an invalid input never reaches a row
/// 2. Update and delete learn whether the row existed from the affected row count, there is no read before the write
/// 3. Storage failures are logged here with their cause, callers only see which action failed
#[derive(Clone)]
pub struct Directory {
    storage: Arc<dyn PersonStorage>,
}

impl Directory {
    pub fn new(storage: Arc<dyn PersonStorage>) -> Self {
        Self { storage }
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Fixed payload, does not touch storage
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: HEALTH_STATUS_OK,
            service: SERVICE_NAME,
        }
    }

    pub async fn list(&self) -> DirectoryResult<Vec<Person>> {
        self.storage
            .list()
            .await
            .map_err(storage_unavailable("fetch persons"))
    }

    pub async fn get(&self, id: PersonId) -> DirectoryResult<Person> {
        self.storage
            .get(id)
            .await
            .map_err(storage_unavailable("fetch person"))?
            .ok_or(DirectoryError::NotFound(id))
    }

    pub async fn create(&self, data: PersonData) -> DirectoryResult<Person> {
        let data = validate(data)?;

        let id = self
            .storage
            .insert(&data)
            .await
            .map_err(storage_unavailable("create person"))?;

        log::info!("Created person [id: {}]", id);

        Ok(Person::from_data(id, data))
    }

    /// Full replacement of name, email and phone, fields left out are cleared
    pub async fn update(&self, id: PersonId, data: PersonData) -> DirectoryResult<Person> {
        let data = validate(data)?;

        let affected = self
            .storage
            .update(id, &data)
            .await
            .map_err(storage_unavailable("update person"))?;

        if affected == 0 {
            return Err(DirectoryError::NotFound(id));
        }

        Ok(Person::from_data(id, data))
    }

    pub async fn delete(&self, id: PersonId) -> DirectoryResult<()> {
        let affected = self
            .storage
            .delete(id)
            .await
            .map_err(storage_unavailable("delete person"))?;

        if affected == 0 {
            return Err(DirectoryError::NotFound(id));
        }

        log::info!("Deleted person [id: {}]", id);

        Ok(())
    }
}

/// Name must be present, empty contact details are stored as absent
fn validate(data: PersonData) -> DirectoryResult<PersonData> {
    if data.name.is_empty() {
        return Err(DirectoryError::InvalidArgument(
            "Name is required".to_string(),
        ));
    }

    Ok(PersonData {
        name: data.name,
        email: data.email.filter(|email| !email.is_empty()),
        phone: data.phone.filter(|phone| !phone.is_empty()),
    })
}

fn storage_unavailable(action: &'static str) -> impl FnOnce(StorageError) -> DirectoryError {
    move |source| {
        log::error!("Error trying to {}: {}", action, source);
        DirectoryError::StorageUnavailable { action, source }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use crate::{
        consts::consts::PersonId,
        model::person::{Person, PersonData},
        persistence::storage::{memory::MemoryStorage, PersonStorage, StorageError, StorageResult},
    };

    use super::Directory;

    /// Storage whose every statement fails, stands in for an unreachable database
    pub struct UnavailableStorage;

    fn unavailable() -> StorageError {
        StorageError::UnableToQuery(anyhow!("connection refused"))
    }

    #[async_trait]
    impl PersonStorage for UnavailableStorage {
        async fn init(&self) -> StorageResult<()> {
            Err(unavailable())
        }

        async fn list(&self) -> StorageResult<Vec<Person>> {
            Err(unavailable())
        }

        async fn get(&self, _id: PersonId) -> StorageResult<Option<Person>> {
            Err(unavailable())
        }

        async fn insert(&self, _data: &PersonData) -> StorageResult<PersonId> {
            Err(unavailable())
        }

        async fn update(&self, _id: PersonId, _data: &PersonData) -> StorageResult<u64> {
            Err(unavailable())
        }

        async fn delete(&self, _id: PersonId) -> StorageResult<u64> {
            Err(unavailable())
        }

        fn backend_name(&self) -> &'static str {
            "unavailable"
        }
    }

    impl Directory {
        pub fn new_test() -> Self {
            Directory::new(Arc::new(MemoryStorage::new()))
        }

        pub fn new_unavailable() -> Self {
            Directory::new(Arc::new(UnavailableStorage))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn person_data(name: &str, email: &str, phone: &str) -> PersonData {
        PersonData::new(
            name.to_string(),
            Some(email.to_string()),
            Some(phone.to_string()),
        )
    }

    mod create {
        use super::*;

        #[test_log::test(tokio::test)]
        async fn create_then_get_happy_path() {
            // Given an empty directory
            let directory = Directory::new_test();

            // When a person is created
            let created = directory
                .create(person_data("A", "a@x.com", "1"))
                .await
                .expect("should create");

            // Then get returns the same fields under the assigned id
            let fetched = directory.get(created.id).await.expect("should exist");

            assert_eq!(fetched, created);
            assert_eq!(fetched.name, "A");
            assert_eq!(fetched.email, Some("a@x.com".to_string()));
            assert_eq!(fetched.phone, Some("1".to_string()));
        }

        #[tokio::test]
        async fn create_assigns_fresh_ids() {
            let directory = Directory::new_test();

            let first = directory.create(PersonData::new_test()).await.unwrap();
            let second = directory.create(PersonData::new_test()).await.unwrap();

            assert_ne!(first.id, second.id);
        }

        #[tokio::test]
        async fn empty_contact_details_are_stored_as_absent() {
            let directory = Directory::new_test();

            let created = directory
                .create(person_data("A", "", ""))
                .await
                .expect("should create");

            assert_eq!(created.email, None);
            assert_eq!(created.phone, None);
        }

        #[rstest]
        #[case(person_data("", "a@x.com", "1"))]
        #[case(PersonData::new(String::new(), None, None))]
        #[tokio::test]
        async fn empty_name_is_rejected(#[case] data: PersonData) {
            let directory = Directory::new_test();

            let err = directory.create(data).await.unwrap_err();

            assert!(matches!(err, DirectoryError::InvalidArgument(_)));
            assert_eq!(err.to_string(), "Name is required");
            assert!(directory.list().await.unwrap().is_empty());
        }
    }

    mod list {
        use super::*;

        #[tokio::test]
        async fn empty_directory_lists_nothing() {
            let directory = Directory::new_test();

            assert_eq!(directory.list().await.unwrap(), Vec::<Person>::new());
        }

        #[tokio::test]
        async fn list_is_ordered_by_ascending_id() {
            let directory = Directory::new_test();

            let a = directory.create(person_data("Zed", "", "")).await.unwrap();
            let b = directory.create(person_data("Amy", "", "")).await.unwrap();

            let ids: Vec<PersonId> = directory
                .list()
                .await
                .unwrap()
                .into_iter()
                .map(|p| p.id)
                .collect();

            assert!(a.id < b.id);
            assert_eq!(ids, vec![a.id, b.id]);
        }
    }

    mod update {
        use super::*;

        #[tokio::test]
        async fn update_is_a_full_replace() {
            // Given a person with every field set
            let directory = Directory::new_test();
            let created = directory
                .create(person_data("A", "a@x.com", "1"))
                .await
                .unwrap();

            // When it is updated with only a name
            let updated = directory
                .update(created.id, PersonData::new("B".to_string(), None, None))
                .await
                .expect("should update");

            // Then the contact details are cleared rather than merged
            assert_eq!(updated.id, created.id);

            let fetched = directory.get(created.id).await.unwrap();
            assert_eq!(fetched.name, "B");
            assert_eq!(fetched.email, None);
            assert_eq!(fetched.phone, None);
        }

        #[tokio::test]
        async fn update_missing_person_is_not_found() {
            let directory = Directory::new_test();

            let err = directory
                .update(PersonId(999_999), PersonData::new_test())
                .await
                .unwrap_err();

            assert!(matches!(err, DirectoryError::NotFound(PersonId(999_999))));
        }

        #[tokio::test]
        async fn update_with_empty_name_leaves_row_untouched() {
            let directory = Directory::new_test();
            let created = directory.create(PersonData::new_test()).await.unwrap();

            let err = directory
                .update(created.id, person_data("", "b@x.com", "2"))
                .await
                .unwrap_err();

            assert!(matches!(err, DirectoryError::InvalidArgument(_)));
            assert_eq!(directory.get(created.id).await.unwrap(), created);
        }

        /// Existence comes from the affected row count. Backends that only count changed rows
        /// would report a same-value update as not found, this pins the matched-row behavior
        #[tokio::test]
        async fn update_with_identical_values_succeeds() {
            let directory = Directory::new_test();
            let created = directory.create(PersonData::new_test()).await.unwrap();

            let updated = directory
                .update(created.id, created.data())
                .await
                .expect("should update");

            assert_eq!(updated, created);
        }
    }

    mod delete {
        use super::*;

        #[tokio::test]
        async fn delete_then_get_is_not_found() {
            let directory = Directory::new_test();
            let created = directory.create(PersonData::new_test()).await.unwrap();

            directory.delete(created.id).await.expect("should delete");

            let err = directory.get(created.id).await.unwrap_err();
            assert!(matches!(err, DirectoryError::NotFound(_)));
        }

        #[tokio::test]
        async fn delete_missing_person_is_not_found() {
            let directory = Directory::new_test();

            let err = directory.delete(PersonId(42)).await.unwrap_err();

            assert!(matches!(err, DirectoryError::NotFound(PersonId(42))));
        }
    }

    mod storage_unavailable {
        use super::*;

        #[test_log::test(tokio::test)]
        async fn every_operation_reports_the_failed_action() {
            let directory = Directory::new_unavailable();

            let errors = vec![
                directory.list().await.unwrap_err(),
                directory.get(PersonId(1)).await.unwrap_err(),
                directory.create(PersonData::new_test()).await.unwrap_err(),
                directory
                    .update(PersonId(1), PersonData::new_test())
                    .await
                    .unwrap_err(),
                directory.delete(PersonId(1)).await.unwrap_err(),
            ];

            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

            assert_eq!(
                messages,
                vec![
                    "Failed to fetch persons",
                    "Failed to fetch person",
                    "Failed to create person",
                    "Failed to update person",
                    "Failed to delete person",
                ]
            );
        }

        #[tokio::test]
        async fn validation_runs_before_storage() {
            let directory = Directory::new_unavailable();

            let err = directory
                .create(person_data("", "", ""))
                .await
                .unwrap_err();

            assert!(matches!(err, DirectoryError::InvalidArgument(_)));
        }

        #[test]
        fn health_does_not_touch_storage() {
            let directory = Directory::new_unavailable();

            assert_eq!(
                directory.health(),
                HealthStatus {
                    status: "ok",
                    service: "meibo-api"
                }
            );
        }
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    fn malformed_ids_are_invalid_arguments(#[case] token: &str) {
        let err: DirectoryError = token.parse::<PersonId>().unwrap_err().into();

        assert!(matches!(err, DirectoryError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Invalid ID");
    }
}
