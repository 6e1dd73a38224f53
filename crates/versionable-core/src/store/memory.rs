//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{VersionableError, VersionableResult};
use crate::traits::{RecordSource, RecordStore};
use crate::types::{RecordId, Versionable};

/// A `BTreeMap`-backed store. Records enumerate in ascending id order.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<BTreeMap<RecordId, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Versionable + Clone + Send + Sync> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.record_id(), r))
            .collect::<BTreeMap<_, _>>();
        Self {
            records: RwLock::new(map),
        }
    }

    /// One past the largest integer id in the store.
    pub fn next_id(&self) -> VersionableResult<i64> {
        let records = self
            .records
            .read()
            .map_err(|_| VersionableError::poisoned("store"))?;
        Ok(records
            .keys()
            .filter_map(RecordId::as_int)
            .max()
            .map_or(1, |n| n + 1))
    }

    /// Number of stored records.
    pub fn len(&self) -> VersionableResult<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| VersionableError::poisoned("store"))?;
        Ok(records.len())
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> VersionableResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: Versionable + Clone + Send + Sync> RecordSource<T> for MemoryStore<T> {
    fn all(&self) -> VersionableResult<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|_| VersionableError::poisoned("store"))?;
        Ok(records.values().cloned().collect())
    }

    fn exists(&self, id: &RecordId) -> VersionableResult<bool> {
        let records = self
            .records
            .read()
            .map_err(|_| VersionableError::poisoned("store"))?;
        Ok(records.contains_key(id))
    }
}

impl<T: Versionable + Clone + Send + Sync> RecordStore<T> for MemoryStore<T> {
    fn insert(&self, record: T) -> VersionableResult<T> {
        let mut records = self
            .records
            .write()
            .map_err(|_| VersionableError::poisoned("store"))?;
        let id = record.record_id();
        if records.contains_key(&id) {
            return Err(VersionableError::duplicate_record(T::TYPE_NAME, id));
        }
        records.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> VersionableResult<T> {
        let mut records = self
            .records
            .write()
            .map_err(|_| VersionableError::poisoned("store"))?;
        match records.get_mut(&record.record_id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(VersionableError::record_not_found(
                T::TYPE_NAME,
                record.record_id(),
            )),
        }
    }

    fn delete(&self, id: &RecordId) -> VersionableResult<T> {
        let mut records = self
            .records
            .write()
            .map_err(|_| VersionableError::poisoned("store"))?;
        records
            .remove(id)
            .ok_or_else(|| VersionableError::record_not_found(T::TYPE_NAME, id))
    }

    fn find(&self, id: &RecordId) -> VersionableResult<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|_| VersionableError::poisoned("store"))?;
        Ok(records.get(id).cloned())
    }
}
