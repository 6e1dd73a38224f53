//! Error types for versionable operations.
//!
//! Every failure bubbles to the persistence call that triggered it. Errors
//! carry a structured code and, where it helps the operator, a suggestion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for versionable operations.
pub type VersionableResult<T> = Result<T, VersionableError>;

/// Main error type for all versionable operations.
#[derive(Error, Debug)]
pub enum VersionableError {
    /// Creating the storage directories or the repository failed.
    #[error("Setup error: {message}")]
    Setup {
        message: String,
        code: ErrorCode,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Encoding, writing or removing a snapshot file failed.
    #[error("Snapshot error: {message}")]
    Snapshot {
        message: String,
        code: ErrorCode,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The version-control tool failed.
    #[error("Version control error: {message}")]
    VersionControl {
        message: String,
        code: ErrorCode,
        output: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Removing snapshots while disabling versioning failed.
    #[error("Teardown error: {message}")]
    Teardown {
        message: String,
        code: ErrorCode,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The type was never enabled on this registry.
    #[error("Type not registered for versioning: {type_name}")]
    NotRegistered { type_name: String },

    /// The record store rejected an operation.
    #[error("Store error: {message}")]
    Store {
        message: String,
        code: ErrorCode,
        record_id: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Setup (SETUP_xxx)
    SetupDirectoryFailed,
    SetupRepositoryFailed,

    // Snapshot (SNAP_xxx)
    SnapEncodeFailed,
    SnapWriteFailed,
    SnapRemoveFailed,

    // Version control (VCS_xxx)
    VcsSpawnFailed,
    VcsCommandFailed,

    // Teardown (TEAR_xxx)
    TearRemoveFailed,

    // Store (STORE_xxx)
    StoreNotFound,
    StoreDuplicate,
    StoreUnreadable,

    // Registry (REG_xxx)
    RegNotRegistered,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SetupDirectoryFailed => "SETUP_001",
            ErrorCode::SetupRepositoryFailed => "SETUP_002",
            ErrorCode::SnapEncodeFailed => "SNAP_001",
            ErrorCode::SnapWriteFailed => "SNAP_002",
            ErrorCode::SnapRemoveFailed => "SNAP_003",
            ErrorCode::VcsSpawnFailed => "VCS_001",
            ErrorCode::VcsCommandFailed => "VCS_002",
            ErrorCode::TearRemoveFailed => "TEAR_001",
            ErrorCode::StoreNotFound => "STORE_001",
            ErrorCode::StoreDuplicate => "STORE_002",
            ErrorCode::StoreUnreadable => "STORE_003",
            ErrorCode::RegNotRegistered => "REG_001",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl VersionableError {
    /// Create a setup error for a directory that could not be created.
    pub fn setup_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Setup {
            message: format!("failed to create directory {}", path.display()),
            code: ErrorCode::SetupDirectoryFailed,
            path: Some(path),
            source: Some(Box::new(source)),
        }
    }

    /// Create a setup error for a repository that could not be initialized.
    pub fn setup_repository(path: impl Into<PathBuf>, source: VersionableError) -> Self {
        let path = path.into();
        Self::Setup {
            message: format!("failed to initialize repository at {}", path.display()),
            code: ErrorCode::SetupRepositoryFailed,
            path: Some(path),
            source: Some(Box::new(source)),
        }
    }

    /// Create a snapshot encoding error.
    pub fn snapshot_encode(
        type_name: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Snapshot {
            message: format!("failed to encode {} snapshot: {}", type_name, source),
            code: ErrorCode::SnapEncodeFailed,
            path: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a snapshot write error.
    pub fn snapshot_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Snapshot {
            message: format!("failed to write {}", path.display()),
            code: ErrorCode::SnapWriteFailed,
            path: Some(path),
            source: Some(Box::new(source)),
        }
    }

    /// Create a snapshot removal error.
    pub fn snapshot_remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Snapshot {
            message: format!("failed to remove {}", path.display()),
            code: ErrorCode::SnapRemoveFailed,
            path: Some(path),
            source: Some(Box::new(source)),
        }
    }

    /// Create an error for a tool that could not be started.
    pub fn vcs_spawn(program: &str, source: std::io::Error) -> Self {
        Self::VersionControl {
            message: format!("could not run '{}': {}", program, source),
            code: ErrorCode::VcsSpawnFailed,
            output: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an error for a tool that exited unsuccessfully.
    pub fn vcs_command(message: impl Into<String>, output: impl Into<String>) -> Self {
        Self::VersionControl {
            message: message.into(),
            code: ErrorCode::VcsCommandFailed,
            output: Some(output.into()),
            source: None,
        }
    }

    /// Create a teardown error.
    pub fn teardown(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Teardown {
            message: format!("failed to remove {}", path.display()),
            code: ErrorCode::TearRemoveFailed,
            path: Some(path),
            source: Some(source),
        }
    }

    /// Create a not registered error.
    pub fn not_registered(type_name: impl Into<String>) -> Self {
        Self::NotRegistered {
            type_name: type_name.into(),
        }
    }

    /// Create a store error for a record that does not exist.
    pub fn record_not_found(type_name: &str, record_id: impl ToString) -> Self {
        let id = record_id.to_string();
        Self::Store {
            message: format!("{} with id '{}' not found", type_name, id),
            code: ErrorCode::StoreNotFound,
            record_id: Some(id),
        }
    }

    /// Create a store error for an id that is already taken.
    pub fn duplicate_record(type_name: &str, record_id: impl ToString) -> Self {
        let id = record_id.to_string();
        Self::Store {
            message: format!("{} with id '{}' already exists", type_name, id),
            code: ErrorCode::StoreDuplicate,
            record_id: Some(id),
        }
    }

    /// Create a store error for a backing file that cannot be read.
    pub fn store_unreadable(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            code: ErrorCode::StoreUnreadable,
            record_id: None,
        }
    }

    /// Create an error for a poisoned lock.
    pub fn poisoned(what: &str) -> Self {
        Self::Internal(format!("{} lock poisoned", what))
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Setup { code, .. } => *code,
            Self::Snapshot { code, .. } => *code,
            Self::VersionControl { code, .. } => *code,
            Self::Teardown { code, .. } => *code,
            Self::Store { code, .. } => *code,
            Self::NotRegistered { .. } => ErrorCode::RegNotRegistered,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Yaml(_) | Self::Json(_) => ErrorCode::SnapEncodeFailed,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Setup { .. } => {
                Some("Check that the storage root is writable and that git is installed")
            }
            Self::VersionControl {
                code: ErrorCode::VcsSpawnFailed,
                ..
            } => Some("Install git or point git_binary at a working executable"),
            Self::VersionControl { .. } => {
                Some("Check the repository under the storage root; it may be locked or corrupt")
            }
            Self::Teardown { .. } => {
                Some("Snapshots are out of sync with the records; re-save records or remove files by hand")
            }
            Self::NotRegistered { .. } => Some("Enable versioning for the type before using it"),
            _ => None,
        }
    }

    /// Returns the path involved in the failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Setup { path, .. } | Self::Snapshot { path, .. } | Self::Teardown { path, .. } => {
                path.as_deref()
            }
            _ => None,
        }
    }
}
