//! Persistence-layer traits the versioning hooks depend on.

use crate::error::VersionableResult;
use crate::types::{RecordId, Versionable};

/// Read access to the current records of one type.
pub trait RecordSource<T: Versionable>: Send + Sync {
    /// Every current record, in a stable order.
    fn all(&self) -> VersionableResult<Vec<T>>;

    /// Whether a record with this id still resolves.
    fn exists(&self, id: &RecordId) -> VersionableResult<bool>;
}

/// A record store that can also be written to.
pub trait RecordStore<T: Versionable>: RecordSource<T> {
    /// Persist a new record. Fails if its id is taken.
    fn insert(&self, record: T) -> VersionableResult<T>;

    /// Replace an existing record. Fails if its id does not resolve.
    fn update(&self, record: T) -> VersionableResult<T>;

    /// Remove a record and return it. Fails if its id does not resolve.
    fn delete(&self, id: &RecordId) -> VersionableResult<T>;

    /// Look up one record.
    fn find(&self, id: &RecordId) -> VersionableResult<Option<T>>;
}
