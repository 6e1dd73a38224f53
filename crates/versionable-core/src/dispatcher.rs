//! Lifecycle hooks: turn record changes into snapshots and commits.
//!
//! For a save the order is fixed: collection snapshot, instance snapshot,
//! commit. For a delete the instance snapshot is removed and the change is
//! committed, even when the record was never snapshotted; the collection
//! snapshot is left as it was unless the type was configured with
//! `refresh_collection_on_delete`, so by default it still lists the deleted
//! record until the next save of that type.

use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{VersionableError, VersionableResult};
use crate::registry::TypeVersioning;
use crate::snapshot::remove_snapshot;
use crate::traits::{CommitOutcome, RecordSource};
use crate::types::{CommitMessage, RecordId, VersionAction, Versionable, VersionableType};

/// What a hook wrote and committed.
#[derive(Debug, Clone)]
pub struct VersionReceipt {
    /// The classified action.
    pub action: VersionAction,
    /// Identity of the versioned record.
    pub record_id: RecordId,
    /// Message of the commit.
    pub message: CommitMessage,
    /// Instance snapshot path (removed for deletes).
    pub instance_path: PathBuf,
    /// Collection snapshot path.
    pub collection_path: PathBuf,
    /// Result of the commit.
    pub commit: CommitOutcome,
}

/// What disabling versioning removed and committed.
#[derive(Debug, Clone)]
pub struct TeardownReceipt {
    /// Snapshot files deleted, collection first.
    pub removed: Vec<PathBuf>,
    /// Message of the commit.
    pub message: CommitMessage,
    /// Result of the commit.
    pub commit: CommitOutcome,
}

/// Callbacks the persistence layer invokes after a successful write.
///
/// Implementations run inline: an error here makes the triggering
/// create/update/delete fail even though the record is already stored.
pub trait VersioningPolicy<T: Versionable>: Send + Sync {
    /// A record was inserted.
    fn on_create(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt>;

    /// An existing record was changed.
    fn on_update(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt>;

    /// A record was removed.
    fn on_delete(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt>;
}

/// Default policy: snapshot to disk and commit.
pub struct Versioner<T> {
    state: Arc<TypeVersioning>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> Clone for Versioner<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Versioner<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Versioner")
            .field("type", &self.state.vtype().name)
            .finish()
    }
}

impl<T: Versionable> Versioner<T> {
    pub(crate) fn new(state: Arc<TypeVersioning>) -> Self {
        Self {
            state,
            _marker: PhantomData,
        }
    }

    /// Shared per-type state.
    pub fn state(&self) -> &Arc<TypeVersioning> {
        &self.state
    }

    /// Naming metadata for `T`.
    pub fn vtype(&self) -> &VersionableType {
        self.state.vtype()
    }

    /// Where the snapshot of record `id` lives.
    pub fn instance_path(&self, id: &RecordId) -> PathBuf {
        self.state.layout().instance_path(self.state.vtype(), id)
    }

    /// Where the collection snapshot lives.
    pub fn collection_path(&self) -> PathBuf {
        self.state.layout().collection_path(self.state.vtype())
    }

    /// Snapshot and commit `record` for an explicitly classified action.
    pub fn version(
        &self,
        record: &T,
        action: VersionAction,
        source: &dyn RecordSource<T>,
    ) -> VersionableResult<VersionReceipt> {
        let _guard = self.state.lock()?;

        let record_id = record.record_id();
        let instance_path = self.instance_path(&record_id);
        let collection_path = self.collection_path();
        let serializer = self.state.serializer();

        match action {
            VersionAction::Created | VersionAction::Updated => {
                let records = source.all()?;
                serializer.write_collection(&collection_path, &records)?;
                serializer.write_instance(&instance_path, record)?;
            }
            VersionAction::Deleted => {
                if !remove_snapshot(&instance_path)? {
                    warn!(
                        type_name = %self.vtype().name,
                        id = %record_id,
                        path = %instance_path.display(),
                        "no snapshot to remove; committing delete anyway"
                    );
                }
                if self.state.refresh_collection_on_delete() {
                    let records = source.all()?;
                    serializer.write_collection(&collection_path, &records)?;
                }
            }
        }
        debug!(
            type_name = %self.vtype().name,
            id = %record_id,
            %action,
            "snapshots written"
        );

        let message = CommitMessage::for_record(action, self.vtype(), &record_id);
        let commit = self.state.commit_engine().commit(&message)?;

        Ok(VersionReceipt {
            action,
            record_id,
            message,
            instance_path,
            collection_path,
            commit,
        })
    }

    /// Hook for callers that only know "a save happened".
    ///
    /// `was_new_record` is the persistence layer's "just inserted" marker.
    pub fn after_save(
        &self,
        record: &T,
        was_new_record: bool,
        source: &dyn RecordSource<T>,
    ) -> VersionableResult<VersionReceipt> {
        let still_exists = source.exists(&record.record_id())?;
        self.version(record, VersionAction::classify(was_new_record, still_exists), source)
    }

    /// Hook for callers that only know "a destroy happened".
    pub fn after_destroy(
        &self,
        record: &T,
        source: &dyn RecordSource<T>,
    ) -> VersionableResult<VersionReceipt> {
        let still_exists = source.exists(&record.record_id())?;
        self.version(record, VersionAction::classify(false, still_exists), source)
    }

    /// Stop versioning `T`: delete the collection snapshot and every current
    /// record's snapshot, then commit.
    ///
    /// Files are removed without checking for them first; a missing file
    /// aborts the teardown with nothing committed.
    pub fn disable(&self, source: &dyn RecordSource<T>) -> VersionableResult<TeardownReceipt> {
        let _guard = self.state.lock()?;

        let mut removed = Vec::new();
        let collection_path = self.collection_path();
        fs::remove_file(&collection_path)
            .map_err(|e| VersionableError::teardown(&collection_path, e))?;
        removed.push(collection_path);

        for record in source.all()? {
            let path = self.instance_path(&record.record_id());
            fs::remove_file(&path).map_err(|e| VersionableError::teardown(&path, e))?;
            removed.push(path);
        }

        let message = CommitMessage::unversioned(self.vtype());
        let commit = self.state.commit_engine().commit(&message)?;

        info!(type_name = %self.vtype().name, removed = removed.len(), "versioning disabled");
        Ok(TeardownReceipt {
            removed,
            message,
            commit,
        })
    }
}

impl<T: Versionable> VersioningPolicy<T> for Versioner<T> {
    fn on_create(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt> {
        self.version(record, VersionAction::Created, source)
    }

    fn on_update(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt> {
        self.version(record, VersionAction::Updated, source)
    }

    fn on_delete(&self, record: &T, source: &dyn RecordSource<T>) -> VersionableResult<VersionReceipt> {
        self.version(record, VersionAction::Deleted, source)
    }
}
