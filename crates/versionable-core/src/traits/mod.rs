//! Core traits for versionable collaborators.

mod record_source;
mod version_control;

pub use record_source::*;
pub use version_control::*;
