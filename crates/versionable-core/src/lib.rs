//! versionable-core - Core library for versionable.
//!
//! Every time a record of an enabled type is created, updated or deleted, a
//! snapshot of the record (and of every record of its type) is written to a
//! storage directory and committed to a git repository living there.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use versionable_core::{MemoryStore, VersionedTable, VersioningConfig, VersioningRegistry};
//!
//! let registry = VersioningRegistry::new(VersioningConfig::from_env()?)?;
//! let people = VersionedTable::new(MemoryStore::new(), Arc::new(registry.enable::<Person>()?));
//!
//! // Writes versions/people/people.yml and versions/people/person-1.yml, then commits
//! people.create(Person { id: 1, name: "Ada".into() })?;
//! ```

pub mod commit;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod inflect;
pub mod layout;
pub mod registry;
pub mod setup;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod types;
pub mod vcs;

// Re-export commonly used types
pub use commit::CommitEngine;
pub use config::{TypeOptions, VersioningConfig};
pub use dispatcher::{TeardownReceipt, VersionReceipt, Versioner, VersioningPolicy};
pub use error::{ErrorCode, VersionableError, VersionableResult};
pub use layout::StorageLayout;
pub use registry::{GuidanceSink, TypeVersioning, VersioningRegistry};
pub use setup::SetupReport;
pub use snapshot::{SnapshotFormat, SnapshotSerializer};
pub use store::{MemoryStore, Versioned, VersionedTable};
pub use traits::{CommitOutcome, RecordSource, RecordStore, VersionControl};
pub use types::{CommitMessage, RecordId, VersionAction, Versionable, VersionableType};
pub use vcs::GitCli;
