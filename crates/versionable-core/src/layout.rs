//! Deterministic snapshot paths below the storage root.
//!
//! ```text
//! {root}/
//!   .git/
//!   people/
//!     people.yml       <- collection snapshot
//!     person-1.yml     <- instance snapshots
//!     person-2.yml
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::snapshot::SnapshotFormat;
use crate::types::{RecordId, VersionableType};

/// Directory name of the repository metadata at the root.
pub const REPOSITORY_MARKER: &str = ".git";

/// Maps types and record ids to file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
    format: SnapshotFormat,
}

impl StorageLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The snapshot format the file extensions follow.
    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// `{root}/{table}`
    pub fn type_dir(&self, vtype: &VersionableType) -> PathBuf {
        self.root.join(&vtype.table_name)
    }

    /// `{root}/{table}/{stem}-{id}.{ext}`
    pub fn instance_path(&self, vtype: &VersionableType, id: &RecordId) -> PathBuf {
        self.type_dir(vtype).join(format!(
            "{}-{}.{}",
            vtype.file_stem,
            file_safe_id(id),
            self.format.extension()
        ))
    }

    /// `{root}/{table}/{table}.{ext}`
    pub fn collection_path(&self, vtype: &VersionableType) -> PathBuf {
        self.type_dir(vtype)
            .join(format!("{}.{}", vtype.table_name, self.format.extension()))
    }

    /// `{root}/.git`
    pub fn repository_marker(&self) -> PathBuf {
        self.root.join(REPOSITORY_MARKER)
    }
}

/// Percent-escape the characters that would split an id into extra path
/// components. `%` is escaped too so distinct ids keep distinct file names.
fn file_safe_id(id: &RecordId) -> Cow<'_, str> {
    let RecordId::Text(text) = id else {
        return Cow::Owned(id.to_string());
    };
    if !text.contains(&['/', '\\', '%'][..]) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
