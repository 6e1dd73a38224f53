//! Version control trait and related types.

use std::path::Path;

use crate::error::VersionableResult;
use crate::layout::REPOSITORY_MARKER;

/// Result of a stage-and-commit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether a new commit was recorded. False when the tree was unchanged.
    pub committed: bool,
    /// Combined output of the underlying tool, for logging.
    pub output: String,
}

impl CommitOutcome {
    /// A recorded commit.
    pub fn committed(output: impl Into<String>) -> Self {
        Self {
            committed: true,
            output: output.into(),
        }
    }

    /// Nothing changed since the last commit.
    pub fn unchanged(output: impl Into<String>) -> Self {
        Self {
            committed: false,
            output: output.into(),
        }
    }
}

/// Adapter over the repository tool holding the snapshot history.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Whether a repository already exists at `root`.
    fn is_repository(&self, root: &Path) -> bool {
        root.join(REPOSITORY_MARKER).exists()
    }

    /// Create a repository at `root`. Returns the tool's output.
    fn initialize_repository(&self, root: &Path) -> VersionableResult<String>;

    /// Stage every change below `root` (additions, edits, removals) and
    /// record one commit with `message`.
    fn commit_all(&self, root: &Path, message: &str) -> VersionableResult<CommitOutcome>;
}
