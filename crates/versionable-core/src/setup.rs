//! Storage directory and repository initialization.
//!
//! `ensure_ready` is idempotent: each step checks before acting, so running
//! it again for a prepared type does nothing.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{VersionableError, VersionableResult};
use crate::layout::StorageLayout;
use crate::traits::VersionControl;
use crate::types::VersionableType;

/// What `ensure_ready` had to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupReport {
    /// The storage root did not exist and was created.
    pub created_root: bool,
    /// The type's directory did not exist and was created.
    pub created_type_dir: bool,
    /// No repository existed at the root and one was initialized.
    pub initialized_repository: bool,
}

impl SetupReport {
    /// True when any step did work.
    pub fn changed_anything(&self) -> bool {
        self.created_root || self.created_type_dir || self.initialized_repository
    }
}

/// Make sure the root, the type directory and the repository exist.
pub fn ensure_ready(
    vtype: &VersionableType,
    layout: &StorageLayout,
    vcs: &dyn VersionControl,
) -> VersionableResult<SetupReport> {
    let mut report = SetupReport::default();
    let root = layout.root();

    if !root.exists() {
        fs::create_dir_all(root).map_err(|e| VersionableError::setup_directory(root, e))?;
        report.created_root = true;
    }

    let type_dir = layout.type_dir(vtype);
    if !type_dir.exists() {
        fs::create_dir(&type_dir).map_err(|e| VersionableError::setup_directory(&type_dir, e))?;
        report.created_type_dir = true;
    }

    if !vcs.is_repository(root) {
        let output = vcs
            .initialize_repository(root)
            .map_err(|e| VersionableError::setup_repository(root, e))?;

        debug!("#### START INITIALIZING GIT REPOSITORY ####");
        debug!("{}", output.trim_end());
        debug!("#### END INITIALIZING GIT REPOSITORY ####");
        report.initialized_repository = true;
    }

    if report.changed_anything() {
        info!(
            type_name = %vtype.name,
            root = %root.display(),
            created_root = report.created_root,
            created_type_dir = report.created_type_dir,
            initialized_repository = report.initialized_repository,
            "versioning storage prepared"
        );
    }

    Ok(report)
}

/// Operator-facing lines printed the first time storage is prepared.
pub fn guidance_lines(storage_root: &Path, storage_dir_name: &str, app_root: &Path) -> Vec<String> {
    let has_gitignore = app_root.join(".gitignore").exists();
    vec![
        "***************** IMPORTANT *****************".to_string(),
        format!(
            "Versionable writes record snapshots and their git history to {}.",
            storage_root.display()
        ),
        format!(
            "If this project is itself tracked by git, you probably want {}/* in its .gitignore.",
            storage_dir_name
        ),
        if has_gitignore {
            format!("{} already has a .gitignore file.", app_root.display())
        } else {
            format!(
                "{} has no .gitignore file yet; you may want to create one now.",
                app_root.display()
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotFormat;
    use crate::traits::MockVersionControl;
    use tempfile::TempDir;

    fn person() -> VersionableType {
        VersionableType::new("Person")
    }

    /// Mock that reports a repository once `initialize_repository` made one.
    fn marker_vcs(expected_inits: usize) -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_repository()
            .returning(|root| root.join(".git").exists());
        vcs.expect_initialize_repository()
            .times(expected_inits)
            .returning(|root| {
                std::fs::create_dir(root.join(".git")).unwrap();
                Ok("Initialized empty Git repository".to_string())
            });
        vcs
    }

    #[test]
    fn test_fresh_setup_creates_everything() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path().join("versions"), SnapshotFormat::Yaml);
        let vcs = marker_vcs(1);

        let report = ensure_ready(&person(), &layout, &vcs).unwrap();

        assert!(report.created_root);
        assert!(report.created_type_dir);
        assert!(report.initialized_repository);
        assert!(dir.path().join("versions/people").is_dir());
        assert!(dir.path().join("versions/.git").is_dir());
    }

    #[test]
    fn test_second_setup_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path().join("versions"), SnapshotFormat::Yaml);
        let vcs = marker_vcs(1);

        ensure_ready(&person(), &layout, &vcs).unwrap();
        let report = ensure_ready(&person(), &layout, &vcs).unwrap();

        assert_eq!(report, SetupReport::default());
        assert!(!report.changed_anything());
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("versions"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_second_type_shares_repository() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path(), SnapshotFormat::Yaml);
        let vcs = marker_vcs(1);

        ensure_ready(&person(), &layout, &vcs).unwrap();
        let report = ensure_ready(&VersionableType::new("Company"), &layout, &vcs).unwrap();

        assert!(!report.created_root);
        assert!(report.created_type_dir);
        assert!(!report.initialized_repository);
    }

    #[test]
    fn test_repository_failure_is_setup_error() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path(), SnapshotFormat::Yaml);
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_repository().returning(|_| false);
        vcs.expect_initialize_repository()
            .returning(|_| Err(VersionableError::vcs_command("git init exited with 128", "")));

        let err = ensure_ready(&person(), &layout, &vcs).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::SetupRepositoryFailed);
    }

    #[test]
    fn test_unwritable_root_is_setup_error() {
        let dir = TempDir::new().unwrap();
        // a file where the root directory should go
        let blocker = dir.path().join("versions");
        std::fs::write(&blocker, "").unwrap();
        let layout = StorageLayout::new(blocker.join("nested"), SnapshotFormat::Yaml);
        let vcs = MockVersionControl::new();

        let err = ensure_ready(&person(), &layout, &vcs).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::SetupDirectoryFailed);
    }

    #[test]
    fn test_guidance_mentions_gitignore_state() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("versions");

        let lines = guidance_lines(&root, "versions", dir.path());
        assert!(lines[2].contains("versions/*"));
        assert!(lines[3].contains("no .gitignore"));

        std::fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();
        let lines = guidance_lines(&root, "versions", dir.path());
        assert!(lines[3].contains("already has a .gitignore"));
    }
}
