//! Integration tests for saving and restoring store state.
//!
//! Runs the background persister against the file backend in a temporary
//! directory and checks what survives a reload.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use taskboard::persist::{
    FileSnapshotStore, PersistError, Persister, STORAGE_KEY, SnapshotStore, spawn_persister,
};
use taskboard::store::TaskStore;
use taskboard_model::{CodecError, Format, PersistedState, Status, TaskFilters};

fn file_persister(dir: &std::path::Path, format: Format) -> Arc<Persister<FileSnapshotStore>> {
    Arc::new(Persister::new(
        FileSnapshotStore::new(dir, format.extension()),
        format,
    ))
}

#[tokio::test]
async fn reload_restores_persisted_slice_in_both_formats() {
    for format in [Format::Json, Format::Binary] {
        let dir = tempfile::tempdir().unwrap();
        let persister = file_persister(dir.path(), format);
        let handle = spawn_persister(Arc::clone(&persister));

        let mut store = TaskStore::bootstrap(None, true);
        handle.attach(&mut store);
        store.move_task(&"1".into(), Status::Done, None).unwrap();
        store.set_filters(TaskFilters {
            search: Some("api".to_string()),
            ..TaskFilters::default()
        });
        assert!(handle.shutdown().await >= 1);

        let record = persister.load().await.unwrap().expect("record written");
        let reloaded = TaskStore::bootstrap(Some(record), true);
        let (before, after) = (store.state(), reloaded.state());

        assert_eq!(after.current_user, before.current_user);
        assert_eq!(after.users, before.users);
        assert_eq!(after.projects, before.projects);
        assert_eq!(after.tasks, before.tasks);
        assert!(after.filters.is_empty(), "filters are not persisted");
        assert_ne!(after.current_board, before.current_board);
        assert_eq!(reloaded.task(&"1".into()).unwrap().status, Status::Done);
    }
}

#[tokio::test]
async fn record_lands_under_storage_key() {
    let dir = tempfile::tempdir().unwrap();
    let persister = file_persister(dir.path(), Format::Json);
    let store = TaskStore::bootstrap(None, true);
    persister
        .save(&PersistedState::partialize(store.state()))
        .await
        .unwrap();

    let path = dir.path().join(format!("{STORAGE_KEY}.json"));
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("\"currentUser\""));
    assert!(text.contains("\"version\": 1"));
    assert!(!text.contains("currentBoard"));
    assert!(!text.contains("filters"));
}

#[tokio::test]
async fn missing_record_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let persister = file_persister(&dir.path().join("not-created-yet"), Format::Binary);
    assert!(persister.load().await.unwrap().is_none());
    persister.clear().await.unwrap();
}

#[tokio::test]
async fn newer_record_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileSnapshotStore::new(dir.path(), "json");
    backend
        .save(STORAGE_KEY, br#"{"version": 99, "currentUser": null}"#.to_vec())
        .await
        .unwrap();

    let persister = Persister::new(backend, Format::Json);
    assert!(matches!(
        persister.load().await,
        Err(PersistError::Codec(CodecError::UnsupportedVersion { found: 99, .. }))
    ));
}

#[tokio::test]
async fn record_without_version_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileSnapshotStore::new(dir.path(), "json");
    backend
        .save(
            STORAGE_KEY,
            br#"{"currentUser": null, "users": [], "projects": [], "tasks": []}"#.to_vec(),
        )
        .await
        .unwrap();

    let persister = Persister::new(backend, Format::Json);
    let record = persister.load().await.unwrap().unwrap();
    assert!(record.tasks.is_empty());

    // Empty record: demo data is seeded on startup.
    let store = TaskStore::bootstrap(Some(record), true);
    assert_eq!(store.state().tasks.len(), 5);
}

#[tokio::test]
async fn clear_removes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let persister = file_persister(dir.path(), Format::Json);
    let store = TaskStore::bootstrap(None, true);
    persister
        .save(&PersistedState::partialize(store.state()))
        .await
        .unwrap();
    persister.clear().await.unwrap();
    assert!(persister.load().await.unwrap().is_none());
}
