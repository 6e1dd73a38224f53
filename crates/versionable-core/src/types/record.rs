//! Record identity and the trait a record type implements to be versioned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a record, as assigned by the store.
///
/// Integer ids sort before text ids; within each kind the natural order
/// applies, so `2` sorts before `10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric primary key.
    Int(i64),
    /// Textual key (UUID, slug, ...).
    Text(String),
}

impl RecordId {
    /// Parse an id from user input, preferring the integer form.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(value.trim().to_string()),
        }
    }

    /// Returns the numeric value when this is an integer id.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<u32> for RecordId {
    fn from(n: u32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A record type whose instances are snapshotted and committed.
///
/// The serialized form is whatever the `Serialize` impl emits; every field it
/// produces ends up in the snapshot.
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Person { id: i64, name: String }
///
/// impl Versionable for Person {
///     const TYPE_NAME: &'static str = "Person";
///     fn record_id(&self) -> RecordId { self.id.into() }
/// }
/// ```
pub trait Versionable: Serialize {
    /// Type name used in file names and commit messages, e.g. `Person`.
    const TYPE_NAME: &'static str;

    /// The record's identity.
    fn record_id(&self) -> RecordId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_integer() {
        assert_eq!(RecordId::parse("42"), RecordId::Int(42));
        assert_eq!(RecordId::parse(" 7 "), RecordId::Int(7));
        assert_eq!(RecordId::parse("abc-1"), RecordId::Text("abc-1".to_string()));
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut ids = vec![RecordId::from(10), RecordId::from(2), RecordId::from("a")];
        ids.sort();
        assert_eq!(ids, vec![RecordId::Int(2), RecordId::Int(10), RecordId::Text("a".into())]);
    }

    #[test]
    fn test_display_and_serde_are_bare() {
        assert_eq!(RecordId::from(7).to_string(), "7");
        assert_eq!(serde_json::to_string(&RecordId::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RecordId::from("k")).unwrap(), "\"k\"");
    }
}
