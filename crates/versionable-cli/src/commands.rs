//! CLI command implementations

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;
use versionable_core::{
    RecordId, RecordSource, VersionReceipt, VersionedTable, VersioningConfig, VersioningRegistry,
};

use crate::args::{Cli, Command, PersonAction};
use crate::db::JsonFileStore;
use crate::person::Person;

/// Resolve configuration: file (if given), then environment, then flags.
pub fn load_config(cli: &Cli) -> Result<VersioningConfig> {
    let mut config = match &cli.config {
        Some(path) => VersioningConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?
            .merge_env()?,
        None => VersioningConfig::from_env()?,
    };
    if let Some(root) = &cli.storage_root {
        config.storage_root = root.clone();
    }
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let store: JsonFileStore<Person> = JsonFileStore::open(&cli.db);

    match cli.command {
        Command::Setup => setup(config),
        Command::Person {
            action: PersonAction::List,
        } => list(&store),
        Command::Person { action } => person(config, store, action),
        Command::Unversion => unversion(config, store),
    }
}

fn setup(config: VersioningConfig) -> Result<()> {
    let registry = VersioningRegistry::new(config)?;
    let versioner = registry.enable::<Person>()?;
    let report = versioner.state().setup_report();

    if report.changed_anything() {
        println!(
            "Versioning enabled for Person in {}",
            versioner.state().layout().root().display()
        );
    } else {
        println!("Versioning for Person was already set up");
    }
    Ok(())
}

fn person(config: VersioningConfig, store: JsonFileStore<Person>, action: PersonAction) -> Result<()> {
    let registry = VersioningRegistry::new(config)?;
    let people: VersionedTable<Person, _> =
        VersionedTable::new(store, Arc::new(registry.enable::<Person>()?));

    let versioned = match action {
        PersonAction::Add(input) => {
            let id = people.store().next_id()?;
            people.create(Person::from_input(id, input, Utc::now()))?
        }
        PersonAction::Update(changes) => {
            let id = RecordId::from(changes.id);
            let Some(mut person) = people.find(&id)? else {
                bail!("no person with id {}", id);
            };
            person.apply(changes, Utc::now());
            people.update(person)?
        }
        PersonAction::Remove { id } => people.destroy(&RecordId::from(id))?,
        PersonAction::List => return list(people.store()),
    };

    print_receipt(&versioned.record, &versioned.receipt);
    Ok(())
}

fn list(store: &JsonFileStore<Person>) -> Result<()> {
    let people = store.all()?;
    if people.is_empty() {
        println!("No people in {}", store.path().display());
        return Ok(());
    }
    for person in people {
        println!(
            "{:>4}  {:<30}  {:<10}  {}",
            person.id,
            person.full_name(),
            person
                .birthdate
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if person.is_living { "living" } else { "deceased" }
        );
    }
    Ok(())
}

fn unversion(config: VersioningConfig, store: JsonFileStore<Person>) -> Result<()> {
    let registry = VersioningRegistry::new(config)?;
    registry.enable::<Person>()?;
    let receipt = registry.disable::<Person>(&store)?;

    info!(removed = receipt.removed.len(), "snapshots removed");
    println!("{}", receipt.message);
    Ok(())
}

fn print_receipt(person: &Person, receipt: &VersionReceipt) {
    println!("{} ({})", receipt.message, person.full_name());
    if !receipt.commit.committed {
        println!("Snapshot unchanged; nothing committed");
    }
}
