//! Commit engine: records the current state of the storage root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::VersionableResult;
use crate::traits::{CommitOutcome, VersionControl};
use crate::types::CommitMessage;

/// Stages and commits everything below one storage root.
#[derive(Clone)]
pub struct CommitEngine {
    root: PathBuf,
    vcs: Arc<dyn VersionControl>,
}

impl CommitEngine {
    /// Create an engine for `root` backed by `vcs`.
    pub fn new(root: impl Into<PathBuf>, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            root: root.into(),
            vcs,
        }
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stage all changes and commit them with `message`.
    ///
    /// The tool's output is logged at debug level. Errors are returned as-is;
    /// files already written stay on disk.
    pub fn commit(&self, message: &CommitMessage) -> VersionableResult<CommitOutcome> {
        let outcome = self.vcs.commit_all(&self.root, message.as_str())?;

        debug!("#### START VERSIONING ####");
        debug!("{}", outcome.output.trim_end());
        debug!("#### END VERSIONING ####");

        if outcome.committed {
            info!(root = %self.root.display(), message = %message, "committed snapshot");
        }
        Ok(outcome)
    }
}

impl std::fmt::Debug for CommitEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitEngine")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VersionableError;
    use crate::traits::MockVersionControl;

    #[test]
    fn test_commit_passes_root_and_message() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_commit_all()
            .withf(|root, message| {
                root == Path::new("/tmp/v") && message == "No longer version controlling Person."
            })
            .times(1)
            .returning(|_, _| Ok(CommitOutcome::committed("[master abc123] ...")));

        let engine = CommitEngine::new("/tmp/v", Arc::new(vcs));
        let outcome = engine
            .commit(&CommitMessage::custom("No longer version controlling Person."))
            .unwrap();
        assert!(outcome.committed);
    }

    #[test]
    fn test_commit_error_propagates() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_commit_all()
            .withf(|root, message| root == Path::new("/tmp/v") && message == "msg")
            .returning(|_, _| Err(VersionableError::vcs_command("git commit exited with 128", "locked")));

        let engine = CommitEngine::new("/tmp/v", Arc::new(vcs));
        let err = engine.commit(&CommitMessage::custom("msg")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::VcsCommandFailed);
    }
}
