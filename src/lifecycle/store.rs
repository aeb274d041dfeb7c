//! Persistence boundary.

use filevault_common::{FileId, Result, StoredFileRecord};

/// How a save was applied by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    Created,
    Updated,
}

/// The host's record store. Filevault only calls it from the coordinator.
pub trait RecordStore: Send + Sync {
    /// Fetch a record by id.
    fn get(&self, id: &FileId) -> Result<Option<StoredFileRecord>>;

    /// Insert or update a record.
    fn save(&self, record: &StoredFileRecord) -> Result<Persisted>;

    /// Delete a record. Returns `false` if it did not exist.
    fn delete(&self, id: &FileId) -> Result<bool>;
}
