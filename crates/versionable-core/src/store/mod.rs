//! Record stores and the versioning wrapper around them.

mod memory;
mod versioned;

pub use memory::MemoryStore;
pub use versioned::{Versioned, VersionedTable};
