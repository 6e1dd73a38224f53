//! Naming metadata for a versioned record type.

use serde::{Deserialize, Serialize};

use super::Versionable;
use crate::inflect;

/// A record category configured for versioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionableType {
    /// Type name as written in commit messages (`Person`).
    pub name: String,
    /// Pluralized, underscored directory name (`people`).
    pub table_name: String,
    /// Lowercased name used as the instance file prefix (`person`).
    pub file_stem: String,
}

impl VersionableType {
    /// Build the naming metadata for a type name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_name: inflect::tableize(&name),
            file_stem: name.to_lowercase(),
            name,
        }
    }

    /// Build the naming metadata for a `Versionable` type.
    pub fn of<T: Versionable>() -> Self {
        Self::new(T::TYPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_naming() {
        let t = VersionableType::new("Person");
        assert_eq!(t.name, "Person");
        assert_eq!(t.table_name, "people");
        assert_eq!(t.file_stem, "person");
    }

    #[test]
    fn test_compound_naming() {
        let t = VersionableType::new("BlogPost");
        assert_eq!(t.table_name, "blog_posts");
        // stem is a plain lowercase of the name, not underscored
        assert_eq!(t.file_stem, "blogpost");
    }
}
