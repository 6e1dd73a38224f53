//! Version actions and commit message formatting.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{RecordId, VersionableType};

/// Timestamp format used in commit messages (`2009-09-23 03:20:56`).
pub const COMMIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What happened to a record to trigger a new version.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum VersionAction {
    /// The record was inserted.
    Created,
    /// An existing record was changed.
    Updated,
    /// The record was removed.
    Deleted,
}

impl VersionAction {
    /// Re-derive the action from what is observable after the store call.
    ///
    /// Use this only when the caller cannot say which operation it ran: a
    /// record still flagged as new was created, a record whose id no longer
    /// resolves was deleted, anything else was updated.
    pub fn classify(was_new_record: bool, still_exists: bool) -> Self {
        if was_new_record {
            Self::Created
        } else if !still_exists {
            Self::Deleted
        } else {
            Self::Updated
        }
    }
}

/// Message attached to a snapshot commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage(String);

impl CommitMessage {
    /// `"<Action> <TypeName>[<id>]: <timestamp>"` stamped with the local time.
    pub fn for_record(action: VersionAction, vtype: &VersionableType, id: &RecordId) -> Self {
        Self::for_record_at(action, vtype, id, &Local::now())
    }

    /// Same as [`CommitMessage::for_record`] with an explicit timestamp.
    pub fn for_record_at<Tz>(
        action: VersionAction,
        vtype: &VersionableType,
        id: &RecordId,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self(format!(
            "{} {}[{}]: {}",
            action,
            vtype.name,
            id,
            at.format(COMMIT_TIMESTAMP_FORMAT)
        ))
    }

    /// Message used when versioning is switched off for a type.
    pub fn unversioned(vtype: &VersionableType) -> Self {
        Self(format!("No longer version controlling {}.", vtype.name))
    }

    /// Free-form message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    #[test]
    fn test_classify() {
        assert_eq!(VersionAction::classify(true, true), VersionAction::Created);
        assert_eq!(VersionAction::classify(false, false), VersionAction::Deleted);
        assert_eq!(VersionAction::classify(false, true), VersionAction::Updated);
        // the "new" marker wins even if the lookup misses
        assert_eq!(VersionAction::classify(true, false), VersionAction::Created);
    }

    #[test]
    fn test_action_strings() {
        assert_eq!(VersionAction::Created.to_string(), "Created");
        assert_eq!(VersionAction::from_str("Deleted").unwrap(), VersionAction::Deleted);
    }

    #[test]
    fn test_commit_message_format() {
        let at = Utc.with_ymd_and_hms(2009, 9, 23, 3, 20, 56).unwrap();
        let msg = CommitMessage::for_record_at(
            VersionAction::Created,
            &VersionableType::new("Person"),
            &RecordId::from(7),
            &at,
        );
        assert_eq!(msg.as_str(), "Created Person[7]: 2009-09-23 03:20:56");
    }

    #[test]
    fn test_commit_message_prefix_with_local_time() {
        let msg = CommitMessage::for_record(
            VersionAction::Updated,
            &VersionableType::new("Person"),
            &RecordId::from(3),
        );
        assert!(msg.as_str().starts_with("Updated Person[3]: "));
    }

    #[test]
    fn test_unversioned_message() {
        let msg = CommitMessage::unversioned(&VersionableType::new("Person"));
        assert_eq!(msg.to_string(), "No longer version controlling Person.");
    }
}
