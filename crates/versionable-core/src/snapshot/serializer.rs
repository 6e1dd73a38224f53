//! Record and collection serialization to snapshot files.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

use super::SnapshotFormat;
use crate::error::{VersionableError, VersionableResult};
use crate::types::Versionable;

/// Turns records into human-readable snapshot text and writes it to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotSerializer {
    format: SnapshotFormat,
}

impl SnapshotSerializer {
    /// Create a serializer for the given format.
    pub fn new(format: SnapshotFormat) -> Self {
        Self { format }
    }

    /// The format this serializer produces.
    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// Encode a single record as a field name to value mapping.
    pub fn serialize_instance<T: Versionable>(&self, record: &T) -> VersionableResult<Vec<u8>> {
        self.encode(T::TYPE_NAME, record)
    }

    /// Encode every record of a type as an ordered sequence of mappings.
    pub fn serialize_collection<T: Versionable>(
        &self,
        records: &[T],
    ) -> VersionableResult<Vec<u8>> {
        self.encode(T::TYPE_NAME, records)
    }

    /// Overwrite `path` with the record's snapshot.
    pub fn write_instance<T: Versionable>(&self, path: &Path, record: &T) -> VersionableResult<()> {
        let bytes = self.serialize_instance(record)?;
        write_snapshot(path, &bytes)
    }

    /// Overwrite `path` with the collection snapshot.
    pub fn write_collection<T: Versionable>(
        &self,
        path: &Path,
        records: &[T],
    ) -> VersionableResult<()> {
        let bytes = self.serialize_collection(records)?;
        write_snapshot(path, &bytes)
    }

    fn encode<V: Serialize + ?Sized>(&self, type_name: &str, value: &V) -> VersionableResult<Vec<u8>> {
        match self.format {
            SnapshotFormat::Yaml => serde_yaml::to_string(value)
                .map(String::into_bytes)
                .map_err(|e| VersionableError::snapshot_encode(type_name, e)),
            SnapshotFormat::Json => {
                let mut bytes = serde_json::to_vec_pretty(value)
                    .map_err(|e| VersionableError::snapshot_encode(type_name, e))?;
                bytes.push(b'\n');
                Ok(bytes)
            }
        }
    }
}

/// Replace the file's content wholesale.
fn write_snapshot(path: &Path, bytes: &[u8]) -> VersionableResult<()> {
    fs::write(path, bytes).map_err(|e| VersionableError::snapshot_write(path, e))
}

/// Remove a snapshot file. Returns `false` when there was nothing to remove.
pub(crate) fn remove_snapshot(path: &Path) -> VersionableResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(VersionableError::snapshot_remove(path, e)),
    }
}
