//! Core types for versionable.

mod action;
mod record;
mod versionable_type;

pub use action::*;
pub use record::*;
pub use versionable_type::*;
