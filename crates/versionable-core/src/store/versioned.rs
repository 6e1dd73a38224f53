//! Store wrapper that versions every successful write.

use std::sync::Arc;

use tracing::warn;

use crate::dispatcher::{VersionReceipt, VersioningPolicy};
use crate::error::VersionableResult;
use crate::traits::RecordStore;
use crate::types::{RecordId, Versionable};

/// A record together with the receipt of the commit it produced.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The record as persisted (for deletes, as it was before removal).
    pub record: T,
    /// What was snapshotted and committed.
    pub receipt: VersionReceipt,
}

/// Runs the store operation, then the versioning policy.
///
/// When the policy fails the store change is NOT rolled back: the record
/// stays persisted and the error is returned to the caller.
pub struct VersionedTable<T: Versionable, S> {
    store: S,
    policy: Arc<dyn VersioningPolicy<T>>,
}

impl<T, S> VersionedTable<T, S>
where
    T: Versionable,
    S: RecordStore<T>,
{
    /// Wrap `store` so that writes are versioned by `policy`.
    pub fn new(store: S, policy: Arc<dyn VersioningPolicy<T>>) -> Self {
        Self { store, policy }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert a record and version it as `Created`.
    pub fn create(&self, record: T) -> VersionableResult<Versioned<T>> {
        let record = self.store.insert(record)?;
        let receipt = self
            .policy
            .on_create(&record, &self.store)
            .inspect_err(|e| warn!(id = %record.record_id(), error = %e, "record stored but not versioned"))?;
        Ok(Versioned { record, receipt })
    }

    /// Replace a record and version it as `Updated`.
    pub fn update(&self, record: T) -> VersionableResult<Versioned<T>> {
        let record = self.store.update(record)?;
        let receipt = self
            .policy
            .on_update(&record, &self.store)
            .inspect_err(|e| warn!(id = %record.record_id(), error = %e, "record stored but not versioned"))?;
        Ok(Versioned { record, receipt })
    }

    /// Remove a record and version it as `Deleted`.
    pub fn destroy(&self, id: &RecordId) -> VersionableResult<Versioned<T>> {
        let record = self.store.delete(id)?;
        let receipt = self
            .policy
            .on_delete(&record, &self.store)
            .inspect_err(|e| warn!(%id, error = %e, "record removed but not versioned"))?;
        Ok(Versioned { record, receipt })
    }

    /// Look up one record.
    pub fn find(&self, id: &RecordId) -> VersionableResult<Option<T>> {
        self.store.find(id)
    }

    /// Every current record.
    pub fn all(&self) -> VersionableResult<Vec<T>> {
        self.store.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VersionableError;
    use crate::store::MemoryStore;
    use crate::traits::{CommitOutcome, RecordSource};
    use crate::types::{CommitMessage, VersionAction};
    use serde::Serialize;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Serialize)]
    struct Note {
        id: i64,
        body: String,
    }

    impl Versionable for Note {
        const TYPE_NAME: &'static str = "Note";
        fn record_id(&self) -> RecordId {
            self.id.into()
        }
    }

    /// Policy that records the actions it saw and optionally fails.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(VersionAction, usize)>>,
        fail: bool,
    }

    impl Recording {
        fn receipt(
            &self,
            action: VersionAction,
            note: &Note,
            source: &dyn RecordSource<Note>,
        ) -> VersionableResult<VersionReceipt> {
            if self.fail {
                return Err(VersionableError::vcs_command("git commit exited with 1", ""));
            }
            let count = source.all()?.len();
            self.seen.lock().unwrap().push((action, count));
            Ok(VersionReceipt {
                action,
                record_id: note.record_id(),
                message: CommitMessage::custom("test"),
                instance_path: PathBuf::new(),
                collection_path: PathBuf::new(),
                commit: CommitOutcome::committed(""),
            })
        }
    }

    impl VersioningPolicy<Note> for Recording {
        fn on_create(&self, r: &Note, s: &dyn RecordSource<Note>) -> VersionableResult<VersionReceipt> {
            self.receipt(VersionAction::Created, r, s)
        }
        fn on_update(&self, r: &Note, s: &dyn RecordSource<Note>) -> VersionableResult<VersionReceipt> {
            self.receipt(VersionAction::Updated, r, s)
        }
        fn on_delete(&self, r: &Note, s: &dyn RecordSource<Note>) -> VersionableResult<VersionReceipt> {
            self.receipt(VersionAction::Deleted, r, s)
        }
    }

    fn note(id: i64, body: &str) -> Note {
        Note {
            id,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_policy_sees_store_after_write() {
        let policy = Arc::new(Recording::default());
        let table: VersionedTable<Note, _> = VersionedTable::new(MemoryStore::new(), policy.clone());

        table.create(note(1, "a")).unwrap();
        table.update(note(1, "b")).unwrap();
        table.destroy(&RecordId::from(1)).unwrap();

        let seen = policy.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (VersionAction::Created, 1),
                (VersionAction::Updated, 1),
                (VersionAction::Deleted, 0),
            ]
        );
    }

    #[test]
    fn test_policy_failure_keeps_record() {
        let policy = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let table: VersionedTable<Note, _> = VersionedTable::new(MemoryStore::new(), policy);

        assert!(table.create(note(1, "a")).is_err());
        assert!(table.find(&RecordId::from(1)).unwrap().is_some());
    }

    #[test]
    fn test_store_failure_skips_policy() {
        let policy = Arc::new(Recording::default());
        let table: VersionedTable<Note, _> = VersionedTable::new(MemoryStore::new(), policy.clone());

        assert!(table.update(note(9, "x")).is_err());
        assert!(policy.seen.lock().unwrap().is_empty());
    }
}
