//! CLI argument definitions using clap
//!
//! Commands:
//! - versionable setup
//! - versionable person add|update|remove|list
//! - versionable unversion

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Versionable - snapshot records to YAML and commit every change to git
#[derive(Parser, Debug)]
#[command(name = "versionable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml, .json or .yaml); environment overrides it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage root, overriding configuration and environment
    #[arg(long, global = true)]
    pub storage_root: Option<PathBuf>,

    /// JSON file holding the people table
    #[arg(long, global = true, default_value = "db/people.json")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enable versioning for people: create the storage directory and repository
    Setup,

    /// Manage people
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Stop versioning people: delete their snapshots and commit
    Unversion,
}

#[derive(Subcommand, Debug)]
pub enum PersonAction {
    /// Add a person
    Add(NewPerson),

    /// Change a person
    Update(PersonChanges),

    /// Remove a person
    Remove {
        /// Id of the person
        id: i64,
    },

    /// List people
    List,
}

#[derive(Args, Debug)]
pub struct NewPerson {
    /// First name
    #[arg(long)]
    pub first: String,

    /// Last name
    #[arg(long)]
    pub last: String,

    /// Birthdate as YYYY-MM-DD
    #[arg(long)]
    pub birthdate: Option<NaiveDate>,

    /// Age in years
    #[arg(long)]
    pub age: Option<i32>,

    /// Record the person as no longer living
    #[arg(long)]
    pub deceased: bool,
}

#[derive(Args, Debug)]
pub struct PersonChanges {
    /// Id of the person
    pub id: i64,

    /// First name
    #[arg(long)]
    pub first: Option<String>,

    /// Last name
    #[arg(long)]
    pub last: Option<String>,

    /// Birthdate as YYYY-MM-DD
    #[arg(long)]
    pub birthdate: Option<NaiveDate>,

    /// Age in years
    #[arg(long)]
    pub age: Option<i32>,

    /// Mark as living
    #[arg(long, conflicts_with = "deceased")]
    pub living: bool,

    /// Mark as no longer living
    #[arg(long)]
    pub deceased: bool,
}

impl PersonChanges {
    /// The requested `is_living` value, if either flag was given.
    pub fn is_living(&self) -> Option<bool> {
        match (self.living, self.deceased) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
