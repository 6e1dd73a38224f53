//! Snapshot encodings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Text encoding used for snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// YAML documents with a `.yml` extension.
    #[default]
    #[serde(alias = "yml")]
    Yaml,
    /// Pretty-printed JSON with a `.json` extension.
    Json,
}

impl SnapshotFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Yaml => "yml",
            SnapshotFormat::Json => "json",
        }
    }
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            "json" => Ok(SnapshotFormat::Json),
            other => Err(format!("unknown snapshot format '{}'", other)),
        }
    }
}
