//! End-to-end lifecycle against a recording version-control double.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tempfile::TempDir;
use versionable_core::{
    CommitOutcome, MemoryStore, RecordId, RecordStore, SnapshotFormat, VersionAction,
    VersionControl, Versionable, VersionableResult, VersionedTable, VersioningConfig,
    VersioningRegistry,
};

#[derive(Debug, Clone, Serialize)]
struct Person {
    id: i64,
    name_first: String,
}

impl Versionable for Person {
    const TYPE_NAME: &'static str = "Person";
    fn record_id(&self) -> RecordId {
        self.id.into()
    }
}

fn person(id: i64, name: &str) -> Person {
    Person {
        id,
        name_first: name.to_string(),
    }
}

/// Records every call instead of running git.
#[derive(Default)]
struct RecordingVcs {
    inits: Mutex<Vec<PathBuf>>,
    commits: Mutex<Vec<String>>,
}

impl RecordingVcs {
    fn commits(&self) -> Vec<String> {
        self.commits.lock().unwrap().clone()
    }
}

impl VersionControl for RecordingVcs {
    fn initialize_repository(&self, root: &Path) -> VersionableResult<String> {
        fs::create_dir(root.join(".git"))?;
        self.inits.lock().unwrap().push(root.to_path_buf());
        Ok("Initialized empty Git repository".to_string())
    }

    fn commit_all(&self, _root: &Path, message: &str) -> VersionableResult<CommitOutcome> {
        self.commits.lock().unwrap().push(message.to_string());
        Ok(CommitOutcome::committed(""))
    }
}

fn config(dir: &TempDir) -> VersioningConfig {
    VersioningConfig::builder()
        .app_root(dir.path())
        .print_setup_guidance(false)
        .build()
}

#[test]
fn create_update_destroy_produces_three_commits() {
    let dir = TempDir::new().unwrap();
    let vcs = Arc::new(RecordingVcs::default());
    let registry = VersioningRegistry::with_version_control(config(&dir), vcs.clone());
    let people: VersionedTable<Person, _> = VersionedTable::new(
        MemoryStore::<Person>::new(),
        Arc::new(registry.enable::<Person>().unwrap()),
    );

    let people_dir = dir.path().join("versions/people");
    let instance = people_dir.join("person-1.yml");
    let collection = people_dir.join("people.yml");

    let created = people.create(person(1, "Ada")).unwrap();
    assert_eq!(created.receipt.action, VersionAction::Created);
    assert!(fs::read_to_string(&instance).unwrap().contains("name_first: Ada"));
    assert!(fs::read_to_string(&collection).unwrap().contains("Ada"));

    people.update(person(1, "Grace")).unwrap();
    let instance_text = fs::read_to_string(&instance).unwrap();
    assert!(instance_text.contains("Grace"));
    assert!(!instance_text.contains("Ada"));
    let collection_text = fs::read_to_string(&collection).unwrap();
    assert_eq!(collection_text.matches("id: 1").count(), 1);

    people.destroy(&RecordId::from(1)).unwrap();
    assert!(!instance.exists());
    // collection is left as written by the last save
    assert_eq!(fs::read_to_string(&collection).unwrap(), collection_text);

    let commits = vcs.commits();
    assert_eq!(commits.len(), 3);
    assert!(commits[0].starts_with("Created Person[1]: "));
    assert!(commits[1].starts_with("Updated Person[1]: "));
    assert!(commits[2].starts_with("Deleted Person[1]: "));
}

#[test]
fn collection_lists_every_record_once_in_id_order() {
    let dir = TempDir::new().unwrap();
    let vcs = Arc::new(RecordingVcs::default());
    let cfg = VersioningConfig {
        format: SnapshotFormat::Json,
        ..config(&dir)
    };
    let registry = VersioningRegistry::with_version_control(cfg, vcs);
    let people: VersionedTable<Person, _> = VersionedTable::new(
        MemoryStore::<Person>::new(),
        Arc::new(registry.enable::<Person>().unwrap()),
    );

    people.create(person(10, "Grace")).unwrap();
    people.create(person(2, "Ada")).unwrap();
    people.update(person(2, "Ada L.")).unwrap();

    let text = fs::read_to_string(dir.path().join("versions/people/people.json")).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![2, 10]);
    assert_eq!(records[0]["name_first"], "Ada L.");
    assert!(dir.path().join("versions/people/person-10.json").exists());
}

#[test]
fn enabling_twice_initializes_once() {
    let dir = TempDir::new().unwrap();
    let vcs = Arc::new(RecordingVcs::default());

    let first = VersioningRegistry::with_version_control(config(&dir), vcs.clone());
    first.enable::<Person>().unwrap();
    // a fresh registry over the same storage, as after a restart
    let second = VersioningRegistry::with_version_control(config(&dir), vcs.clone());
    let versioner = second.enable::<Person>().unwrap();

    assert_eq!(vcs.inits.lock().unwrap().len(), 1);
    assert!(!versioner.state().setup_report().changed_anything());
}

#[test]
fn unversion_removes_snapshots_and_commits() {
    let dir = TempDir::new().unwrap();
    let vcs = Arc::new(RecordingVcs::default());
    let registry = VersioningRegistry::with_version_control(config(&dir), vcs.clone());
    let store = MemoryStore::<Person>::new();
    let versioner = registry.enable::<Person>().unwrap();

    for (id, name) in [(1, "Ada"), (2, "Grace")] {
        let p = store.insert(person(id, name)).unwrap();
        versioner.after_save(&p, true, &store).unwrap();
    }

    let receipt = registry.disable::<Person>(&store).unwrap();
    let people_dir = dir.path().join("versions/people");
    assert_eq!(
        receipt.removed,
        vec![
            people_dir.join("people.yml"),
            people_dir.join("person-1.yml"),
            people_dir.join("person-2.yml"),
        ]
    );
    assert_eq!(fs::read_dir(&people_dir).unwrap().count(), 0);
    assert_eq!(
        vcs.commits().last().map(String::as_str),
        Some("No longer version controlling Person.")
    );
}

#[test]
fn versioning_failure_surfaces_to_caller() {
    let dir = TempDir::new().unwrap();
    let registry =
        VersioningRegistry::with_version_control(config(&dir), Arc::new(RecordingVcs::default()));
    let people: VersionedTable<Person, _> = VersionedTable::new(
        MemoryStore::<Person>::new(),
        Arc::new(registry.enable::<Person>().unwrap()),
    );

    // a directory where the instance snapshot should be written
    fs::create_dir(dir.path().join("versions/people/person-1.yml")).unwrap();

    let err = people.create(person(1, "Ada")).unwrap_err();
    assert_eq!(err.code(), versionable_core::ErrorCode::SnapWriteFailed);
    assert!(people.find(&RecordId::from(1)).unwrap().is_some());
}
