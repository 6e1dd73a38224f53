//! Snapshot serialization.
//!
//! A snapshot is a point-in-time text rendering of one record, or of every
//! record of a type. Files are always overwritten wholesale and are never
//! read back into live records.

mod format;
mod serializer;

pub use format::SnapshotFormat;
pub(crate) use serializer::remove_snapshot;
pub use serializer::SnapshotSerializer;
