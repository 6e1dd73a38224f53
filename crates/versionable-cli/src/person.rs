//! The `people` table of the demo application.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use versionable_core::{RecordId, Versionable};

use crate::args::{NewPerson, PersonChanges};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name_first: String,
    pub name_last: String,
    pub birthdate: Option<NaiveDate>,
    pub age: Option<i32>,
    pub is_living: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Versionable for Person {
    const TYPE_NAME: &'static str = "Person";

    fn record_id(&self) -> RecordId {
        self.id.into()
    }
}

impl Person {
    /// Build a new record from command line input.
    pub fn from_input(id: i64, input: NewPerson, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name_first: input.first,
            name_last: input.last,
            birthdate: input.birthdate,
            age: input.age,
            is_living: !input.deceased,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the given changes and bump `updated_at`.
    pub fn apply(&mut self, changes: PersonChanges, now: DateTime<Utc>) {
        if let Some(living) = changes.is_living() {
            self.is_living = living;
        }
        if let Some(first) = changes.first {
            self.name_first = first;
        }
        if let Some(last) = changes.last {
            self.name_last = last;
        }
        if changes.birthdate.is_some() {
            self.birthdate = changes.birthdate;
        }
        if changes.age.is_some() {
            self.age = changes.age;
        }
        self.updated_at = now;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_first, self.name_last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2009, 9, 23, hour, 20, 56).unwrap()
    }

    fn ada() -> Person {
        Person::from_input(
            1,
            NewPerson {
                first: "Ada".into(),
                last: "Lovelace".into(),
                birthdate: NaiveDate::from_ymd_opt(1815, 12, 10),
                age: None,
                deceased: false,
            },
            at(3),
        )
    }

    #[test]
    fn test_from_input_defaults_to_living() {
        let person = ada();
        assert!(person.is_living);
        assert_eq!(person.created_at, person.updated_at);
        assert_eq!(person.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut person = ada();
        person.apply(
            PersonChanges {
                id: 1,
                first: None,
                last: Some("King".into()),
                birthdate: None,
                age: Some(36),
                living: false,
                deceased: true,
            },
            at(4),
        );

        assert_eq!(person.name_first, "Ada");
        assert_eq!(person.name_last, "King");
        assert_eq!(person.birthdate, NaiveDate::from_ymd_opt(1815, 12, 10));
        assert_eq!(person.age, Some(36));
        assert!(!person.is_living);
        assert_eq!(person.updated_at, at(4));
        assert_eq!(person.created_at, at(3));
    }
}
