use models::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ServiceError;
use crate::storage::Record as StoredRecord;

/// CRUD surface shared by every entity family.
///
/// The HTTP layer is written once against this trait; family-specific reads
/// (by category, by email, ...) stay as inherent methods on each service.
pub trait EntityService: Send + Sync + 'static {
    type Record: StoredRecord + Serialize + 'static;
    type Input: DeserializeOwned + Validate + Send + 'static;

    /// Active records in insertion order.
    fn list_all(&self) -> Vec<Self::Record>;

    fn get_by_id(&self, id: i32) -> Option<Self::Record>;

    /// Case-insensitive substring search. A blank term lists everything.
    fn search(&self, term: &str) -> Vec<Self::Record>;

    /// Validate and store `input` under the next id.
    fn create(&self, input: Self::Input) -> Result<Self::Record, ServiceError>;

    /// Overwrite the active record `id`. `Ok(None)` when it does not exist.
    fn update(&self, id: i32, input: Self::Input) -> Result<Option<Self::Record>, ServiceError>;

    /// Soft delete; false when `id` is unknown or already inactive.
    fn delete(&self, id: i32) -> bool;
}

/// Lowercased search needle, or `None` when the term is blank.
pub(crate) fn needle(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}
