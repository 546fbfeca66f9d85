//! Whole-run indexing over a directory of behavior documents.

use std::fs;
use std::path::{Path, PathBuf};

use bindex::graph::{MemoryStore, ReferenceKind, SymbolId};
use bindex::project::{IndexError, IndexOptions, IndexSummary, Indexer};
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn behavior_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "greet.json",
        r#"{
            "behaviorID": "Greet",
            "behaviorClass": "Dispatcher",
            "anonymousBehaviors": ["Wave", "LookAround"]
        }"#,
    );
    write(
        dir.path(),
        "anims/wave.json",
        r#"{ "behaviorID": "Wave", "behaviorClass": "PlayAnim", "getIn": "WaveGetIn" }"#,
    );
    write(dir.path(), "anims/broken.json", r#"{ "behaviorID": "Broken", "#);
    write(dir.path(), "list.json", r#"["not", "a", "behavior"]"#);
    write(dir.path(), "README.md", "not indexed");
    dir
}

fn symbol(store: &MemoryStore, name: &str) -> SymbolId {
    store
        .find_symbol(name)
        .unwrap_or_else(|| panic!("missing symbol {name}"))
        .id
}

#[test]
fn test_index_directory() {
    let dir = behavior_dir();
    let indexer = Indexer::default();

    let (store, summary) = indexer
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.documents_indexed, 2);
    assert_eq!(summary.documents_skipped, 2);
    assert_eq!(summary.files, 2);
    assert_eq!(store.file_count(), 2);
    assert!(!store.is_open());

    let greet = symbol(&store, "Greet");
    let dispatcher = symbol(&store, "Dispatcher");
    assert!(store.find_reference(greet, dispatcher, ReferenceKind::TypeUsage).is_some());

    let behaviors = symbol(&store, "Greet.anonymousBehaviors");
    assert!(store.find_reference(behaviors, symbol(&store, "Wave"), ReferenceKind::Call).is_some());
    assert_eq!(store.symbols_named("Wave").count(), 1);

    let get_in = symbol(&store, "Wave.getIn");
    assert!(store.find_reference(get_in, symbol(&store, "WaveGetIn"), ReferenceKind::Usage).is_some());
}

#[test]
fn test_summary_matches_store() {
    let dir = behavior_dir();
    let (store, summary) = Indexer::default()
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(
        summary,
        IndexSummary {
            documents_indexed: 2,
            documents_skipped: 2,
            symbols: store.symbol_count(),
            files: store.file_count(),
            references: store.reference_count(),
        }
    );
}

#[test]
fn test_overlapping_inputs_are_indexed_once() {
    let dir = behavior_dir();
    let wave = dir.path().join("anims/wave.json");

    let (store, summary) = Indexer::default()
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().to_path_buf(), wave])
        .unwrap();

    assert_eq!(summary.documents_indexed, 2);
    assert_eq!(store.symbols_named("Wave").count(), 1);
}

#[test]
fn test_custom_extension() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "idle.behavior",
        r#"{ "behaviorID": "Idle", "behaviorClass": "Wait" }"#,
    );
    write(
        dir.path(),
        "skipped.json",
        r#"{ "behaviorID": "Skipped", "behaviorClass": "Wait" }"#,
    );

    let options = IndexOptions {
        extension: "behavior".to_string(),
        ..IndexOptions::default()
    };
    let (store, summary) = Indexer::new(options)
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.documents_indexed, 1);
    assert!(store.find_symbol("Idle").is_some());
    assert!(store.find_symbol("Skipped").is_none());
}

#[test]
fn test_extraction_failure_fails_run() {
    let dir = behavior_dir();
    write(dir.path(), "z_missing_class.json", r#"{ "behaviorID": "Orphan" }"#);

    let err = Indexer::default()
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().to_path_buf()])
        .unwrap_err();

    match err {
        IndexError::Extract { path, .. } => assert!(path.ends_with("z_missing_class.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extraction_failure_commits_nothing() {
    let good = TempDir::new().unwrap();
    write(
        good.path(),
        "idle.json",
        r#"{ "behaviorID": "Idle", "behaviorClass": "Wait" }"#,
    );
    let bad = behavior_dir();
    write(bad.path(), "z_missing_class.json", r#"{ "behaviorID": "Orphan" }"#);

    let mut store = MemoryStore::new();
    let indexer = Indexer::default();
    indexer
        .index(&mut store, "behaviors.db", &[good.path().to_path_buf()])
        .unwrap();
    let before = store.snapshot();

    let err = indexer
        .index(&mut store, "behaviors.db", &[bad.path().to_path_buf()])
        .unwrap_err();
    assert!(matches!(err, IndexError::Extract { .. }));

    assert!(!store.is_open());
    assert!(!store.in_transaction());
    assert_eq!(store.snapshot(), before);
    assert!(store.find_symbol("Greet").is_none());
    assert!(store.find_symbol("Orphan").is_none());
}

#[test]
fn test_no_inputs() {
    let err = Indexer::default()
        .index(MemoryStore::new(), "behaviors.db", &[])
        .unwrap_err();
    assert!(matches!(err, IndexError::NoInputs));
}

#[test]
fn test_missing_input_path() {
    let dir = TempDir::new().unwrap();
    let err = Indexer::default()
        .index(MemoryStore::new(), "behaviors.db", &[dir.path().join("absent")])
        .unwrap_err();
    assert!(matches!(err, IndexError::Load(_)));
}
