//! JSON-file-backed record store.
//!
//! The whole table is read on every call and rewritten on every change. A
//! missing file is an empty table.

use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use versionable_core::{RecordId, RecordSource, RecordStore, Versionable, VersionableError, VersionableResult};

pub struct JsonFileStore<T> {
    path: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Versionable + Serialize + DeserializeOwned + Clone,
{
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One past the largest integer id in the table.
    pub fn next_id(&self) -> VersionableResult<i64> {
        Ok(self
            .load()?
            .keys()
            .filter_map(RecordId::as_int)
            .max()
            .map_or(1, |n| n + 1))
    }

    fn load(&self) -> VersionableResult<BTreeMap<RecordId, T>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let records: Vec<T> = serde_json::from_str(&content).map_err(|e| {
            VersionableError::store_unreadable(format!(
                "cannot parse {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(records.into_iter().map(|r| (r.record_id(), r)).collect())
    }

    fn save(&self, records: &BTreeMap<RecordId, T>) -> VersionableResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let rows: Vec<&T> = records.values().collect();
        let mut json = serde_json::to_string_pretty(&rows)?;
        json.push('\n');
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn modify<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<RecordId, T>) -> VersionableResult<R>,
    ) -> VersionableResult<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| VersionableError::poisoned("store"))?;
        let mut records = self.load()?;
        let result = f(&mut records)?;
        self.save(&records)?;
        Ok(result)
    }
}

impl<T> RecordSource<T> for JsonFileStore<T>
where
    T: Versionable + Serialize + DeserializeOwned + Clone,
{
    fn all(&self) -> VersionableResult<Vec<T>> {
        Ok(self.load()?.into_values().collect())
    }

    fn exists(&self, id: &RecordId) -> VersionableResult<bool> {
        Ok(self.load()?.contains_key(id))
    }
}

impl<T> RecordStore<T> for JsonFileStore<T>
where
    T: Versionable + Serialize + DeserializeOwned + Clone,
{
    fn insert(&self, record: T) -> VersionableResult<T> {
        self.modify(|records| {
            let id = record.record_id();
            if records.contains_key(&id) {
                return Err(VersionableError::duplicate_record(T::TYPE_NAME, id));
            }
            records.insert(id, record.clone());
            Ok(record)
        })
    }

    fn update(&self, record: T) -> VersionableResult<T> {
        self.modify(|records| {
            let id = record.record_id();
            match records.get_mut(&id) {
                Some(slot) => {
                    *slot = record.clone();
                    Ok(record)
                }
                None => Err(VersionableError::record_not_found(T::TYPE_NAME, id)),
            }
        })
    }

    fn delete(&self, id: &RecordId) -> VersionableResult<T> {
        self.modify(|records| {
            records
                .remove(id)
                .ok_or_else(|| VersionableError::record_not_found(T::TYPE_NAME, id))
        })
    }

    fn find(&self, id: &RecordId) -> VersionableResult<Option<T>> {
        Ok(self.load()?.remove(id))
    }
}
