//! Task file round trips and compatibility with existing files

use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use ticklist_core::persistence::{load_or_onboard, onboarding_snapshot};
use ticklist_core::{
    JsonFileStorage, KeyInput, LogNotifier, Moment, Session, SortMode, Storage, TaskId, TaskStore,
};

/// A file as written by earlier versions, including the zero-time deadline
const LEGACY_FILE: &str = r#"{
  "themeIndex": 3,
  "sortMode": 2,
  "tasks": [
    {
      "id": 1700000000000000001,
      "title": "pay rent",
      "done": false,
      "dueAt": "2026-11-01T09:00:00Z",
      "notified": false
    },
    {
      "id": 1700000000000000002,
      "title": "read book",
      "done": true,
      "dueAt": "0001-01-01T00:00:00Z",
      "notified": false
    },
    {
      "id": 0,
      "title": "imported",
      "done": false,
      "dueAt": "0001-01-01T00:00:00Z",
      "notified": true
    }
  ]
}"#;

#[test]
fn test_reads_legacy_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(&path, LEGACY_FILE).unwrap();

    let storage = JsonFileStorage::new(&path);
    let snapshot = load_or_onboard(&storage, 10);
    assert_eq!(snapshot.theme_index, 3);
    assert_eq!(snapshot.sort_mode, SortMode::CompleteFirst);
    assert_eq!(snapshot.tasks.len(), 3);
    assert_eq!(
        snapshot.tasks[0].due_at,
        Some(Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap())
    );
    assert_eq!(snapshot.tasks[1].due_at, None);

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let store = TaskStore::from_snapshot(snapshot, now);
    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    // Complete-first, then by id; the imported task got a fresh, larger id
    assert_eq!(titles, vec!["read book", "pay rent", "imported"]);
    assert!(store.tasks().iter().all(|t| t.id != TaskId::UNASSIGNED));
}

#[test]
fn test_written_file_uses_stable_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("todos.json"));
    storage.save(&onboarding_snapshot()).unwrap();

    let raw = fs::read_to_string(storage.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["themeIndex"], 0);
    assert_eq!(value["sortMode"], 0);
    assert_eq!(value["tasks"][0]["id"], 1);
    assert_eq!(value["tasks"][0]["title"], "Press 'n' to add a new task");
    assert_eq!(value["tasks"][3]["done"], true);
    assert!(value["tasks"][0].get("dueAt").is_none());
    // Pretty-printed
    assert!(raw.contains("\n  "));
}

#[test]
fn test_session_writes_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("todos.json");
    let now = Moment::now();

    let mut session = Session::load(
        Box::new(JsonFileStorage::new(&path)),
        Box::new(LogNotifier),
        10,
        now,
    );
    assert_eq!(session.store().len(), 7);

    session.handle_key(KeyInput::Char('n'), now);
    for ch in "from disk".chars() {
        session.handle_key(KeyInput::Char(ch), now);
    }
    session.handle_key(KeyInput::Enter, now);

    let reloaded = JsonFileStorage::new(&path).load().unwrap();
    assert_eq!(reloaded.tasks.len(), 8);
    assert_eq!(reloaded.tasks[7].title, "from disk");
}

#[test]
fn test_out_of_range_theme_is_reset_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(&path, r#"{"themeIndex": 57, "sortMode": 0, "tasks": []}"#).unwrap();

    let session = Session::load(
        Box::new(JsonFileStorage::new(&path)),
        Box::new(LogNotifier),
        10,
        Moment::now(),
    );
    assert_eq!(session.theme_index(), 0);
    assert!(session.store().is_empty());
}
