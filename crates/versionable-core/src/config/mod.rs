//! Configuration system for versionable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VersionableError, VersionableResult};
use crate::snapshot::SnapshotFormat;

/// Name of the storage directory created under the application root.
pub const DEFAULT_STORAGE_DIR: &str = "versions";

/// Main versioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Root of the application; used for the default storage root and for
    /// the `.gitignore` hint printed on first setup.
    pub app_root: PathBuf,
    /// Directory holding every snapshot and the repository.
    pub storage_root: PathBuf,
    /// Snapshot encoding.
    pub format: SnapshotFormat,
    /// Path or name of the git executable.
    pub git_binary: String,
    /// Commit author as `Name <email>`; the repository default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_author: Option<String>,
    /// Print operator guidance the first time directories are created.
    pub print_setup_guidance: bool,
    /// Rewrite the collection snapshot before committing a delete.
    pub refresh_collection_on_delete: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        let app_root = PathBuf::from(".");
        Self {
            storage_root: app_root.join(DEFAULT_STORAGE_DIR),
            app_root,
            format: SnapshotFormat::default(),
            git_binary: "git".to_string(),
            commit_author: None,
            print_setup_guidance: true,
            refresh_collection_on_delete: false,
        }
    }
}

impl VersioningConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> VersionableResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| VersionableError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| VersionableError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| VersionableError::Configuration(e.to_string())),
            _ => Err(VersionableError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `VERSIONABLE_APP_ROOT` (default: `.`)
    /// - `VERSIONABLE_STORAGE_ROOT` (default: `<app root>/versions`)
    /// - `VERSIONABLE_FORMAT` (`yaml`, `yml` or `json`)
    /// - `VERSIONABLE_GIT_BIN` (default: `git`)
    /// - `VERSIONABLE_COMMIT_AUTHOR`
    /// - `VERSIONABLE_QUIET_SETUP` (disables setup guidance)
    /// - `VERSIONABLE_REFRESH_ON_DELETE`
    pub fn from_env() -> VersionableResult<Self> {
        Self::default().merge_env()
    }

    /// Overlay environment variables on this configuration.
    pub fn merge_env(mut self) -> VersionableResult<Self> {
        if let Ok(root) = std::env::var("VERSIONABLE_APP_ROOT") {
            // keep the storage root tied to the app root unless it was moved
            if self.storage_root == self.app_root.join(DEFAULT_STORAGE_DIR) {
                self.storage_root = PathBuf::from(&root).join(DEFAULT_STORAGE_DIR);
            }
            self.app_root = PathBuf::from(root);
        }

        if let Ok(root) = std::env::var("VERSIONABLE_STORAGE_ROOT") {
            self.storage_root = PathBuf::from(root);
        }

        if let Ok(format) = std::env::var("VERSIONABLE_FORMAT") {
            self.format = format.parse().map_err(|_| {
                VersionableError::Configuration(format!(
                    "VERSIONABLE_FORMAT must be yaml or json, got '{}'",
                    format
                ))
            })?;
        }

        if let Ok(git) = std::env::var("VERSIONABLE_GIT_BIN") {
            self.git_binary = git;
        }

        if let Ok(author) = std::env::var("VERSIONABLE_COMMIT_AUTHOR") {
            self.commit_author = Some(author);
        }

        if std::env::var("VERSIONABLE_QUIET_SETUP").is_ok() {
            self.print_setup_guidance = false;
        }

        if std::env::var("VERSIONABLE_REFRESH_ON_DELETE").is_ok() {
            self.refresh_collection_on_delete = true;
        }

        Ok(self)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> VersioningConfigBuilder {
        VersioningConfigBuilder::default()
    }

    /// Name of the storage directory, for the `.gitignore` hint.
    pub fn storage_dir_name(&self) -> String {
        self.storage_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())
    }
}

/// Per-type overrides applied when versioning is enabled for one type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeOptions {
    /// Storage root for this type only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,
}

impl TypeOptions {
    /// Override the storage root for this type.
    pub fn storage_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_root = Some(path.into());
        self
    }
}

/// Builder for VersioningConfig.
#[derive(Default)]
pub struct VersioningConfigBuilder {
    config: VersioningConfig,
}

impl VersioningConfigBuilder {
    /// Set the application root. Moves the storage root along with it unless
    /// one was set explicitly.
    pub fn app_root(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if self.config.storage_root == self.config.app_root.join(DEFAULT_STORAGE_DIR) {
            self.config.storage_root = path.join(DEFAULT_STORAGE_DIR);
        }
        self.config.app_root = path;
        self
    }

    /// Set the storage root.
    pub fn storage_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_root = path.into();
        self
    }

    /// Set the snapshot format.
    pub fn format(mut self, format: SnapshotFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the git executable.
    pub fn git_binary(mut self, binary: impl Into<String>) -> Self {
        self.config.git_binary = binary.into();
        self
    }

    /// Set the commit author (`Name <email>`).
    pub fn commit_author(mut self, author: impl Into<String>) -> Self {
        self.config.commit_author = Some(author.into());
        self
    }

    /// Enable or disable first-setup guidance on stdout.
    pub fn print_setup_guidance(mut self, enabled: bool) -> Self {
        self.config.print_setup_guidance = enabled;
        self
    }

    /// Rewrite the collection snapshot before committing a delete.
    pub fn refresh_collection_on_delete(mut self, enabled: bool) -> Self {
        self.config.refresh_collection_on_delete = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> VersioningConfig {
        self.config
    }
}
