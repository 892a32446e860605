//! Integration tests for the task store.
//!
//! Drives `TaskStore` through the public API the way a UI consumer would:
//! demo bootstrap, task mutations, board consistency, project edits and
//! subscriber notification.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::similar_names)]

use std::sync::{Arc, Mutex};

use taskboard::store::{EntityKind, SharedTaskStore, StoreError, TaskStore};
use taskboard::views;
use taskboard_model::{
    Board, PersistedState, Priority, ProjectPatch, Status, Task, TaskFilters, TaskId, TaskPatch,
};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn demo_store() -> TaskStore {
    TaskStore::bootstrap(None, true)
}

fn board(store: &TaskStore) -> &Board {
    store.state().current_board.as_ref().expect("board loaded")
}

/// Ids in the column for `status`, in order.
fn column(store: &TaskStore, status: Status) -> Vec<&str> {
    board(store)
        .column(status)
        .expect("column exists")
        .task_ids
        .iter()
        .map(TaskId::as_str)
        .collect()
}

/// Asserts every task sits in exactly the column matching its status.
fn assert_membership(store: &TaskStore) {
    let board = board(store);
    for task in &store.state().tasks {
        let holders: Vec<Status> = board
            .columns
            .iter()
            .filter(|c| c.contains(&task.id))
            .map(|c| c.status)
            .collect();
        assert_eq!(holders, [task.status], "task {} misplaced", task.id);
    }
}

// ===========================================================================
// Bootstrap
// ===========================================================================

#[test]
fn demo_bootstrap_has_expected_layout() {
    let store = demo_store();
    let state = store.state();
    assert_eq!(state.users.len(), 4);
    assert_eq!(state.projects.len(), 1);
    assert_eq!(state.tasks.len(), 5);
    assert_eq!(state.current_user.as_ref().unwrap().id.as_str(), "1");
    assert_eq!(state.current_project.as_ref().unwrap().id.as_str(), "1");

    assert_eq!(column(&store, Status::Todo), ["1", "5"]);
    assert_eq!(column(&store, Status::InProgress), ["2"]);
    assert_eq!(column(&store, Status::Review), ["3"]);
    assert_eq!(column(&store, Status::Done), ["4"]);
    assert_membership(&store);
}

#[test]
fn bootstrap_without_demo_is_empty() {
    let store = TaskStore::bootstrap(None, false);
    assert!(store.state().tasks.is_empty());
    assert!(store.state().current_board.is_none());
    assert!(store.state().current_user.is_some());
}

#[test]
fn bootstrap_from_record_rebuilds_board() {
    let mut source = demo_store();
    source.move_task(&"5".into(), Status::Review, Some(0)).unwrap();
    let record = PersistedState::partialize(source.state());

    let store = TaskStore::bootstrap(Some(record), true);
    assert_eq!(store.state().tasks, source.state().tasks);
    assert_eq!(column(&store, Status::Review), ["3", "5"]);
    assert_eq!(board(&store).id.as_str(), "1-board");
    assert_membership(&store);
}

// ===========================================================================
// Task mutations
// ===========================================================================

#[test]
fn move_task_to_done() {
    let mut store = demo_store();
    store.move_task(&"1".into(), Status::Done, None).unwrap();

    assert_eq!(store.task(&"1".into()).unwrap().status, Status::Done);
    assert_eq!(column(&store, Status::Done), ["4", "1"]);
    assert!(!column(&store, Status::Todo).contains(&"1"));
    assert_membership(&store);
}

#[test]
fn move_task_with_index_inserts_there() {
    let mut store = demo_store();
    store.move_task(&"5".into(), Status::Done, Some(0)).unwrap();
    assert_eq!(column(&store, Status::Done), ["5", "4"]);
}

#[test]
fn move_task_index_out_of_range_clamps() {
    let mut store = demo_store();
    store.move_task(&"2".into(), Status::Todo, Some(99)).unwrap();
    assert_eq!(column(&store, Status::Todo), ["1", "5", "2"]);
}

#[test]
fn move_within_same_column_reorders() {
    let mut store = demo_store();
    store.move_task(&"5".into(), Status::Todo, Some(0)).unwrap();
    assert_eq!(column(&store, Status::Todo), ["5", "1"]);
    assert_membership(&store);
}

#[test]
fn move_missing_task_leaves_state_unchanged() {
    let mut store = demo_store();
    let before = Arc::clone(store.state());
    let err = store
        .move_task(&"missing-id".into(), Status::Done, None)
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            kind: EntityKind::Task,
            id: "missing-id".to_string()
        }
    );
    assert!(Arc::ptr_eq(&before, store.state()));
}

#[test]
fn add_task_lands_in_matching_column() {
    let mut store = demo_store();
    let mut task = Task::new("6", "Audit dependencies", "1");
    task.status = Status::InProgress;
    store.add_task(task).unwrap();

    assert_eq!(store.state().tasks.len(), 6);
    assert_eq!(column(&store, Status::InProgress), ["2", "6"]);
    assert_membership(&store);
}

#[test]
fn add_duplicate_task_is_rejected() {
    let mut store = demo_store();
    let err = store.add_task(Task::new("1", "Clash", "1")).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { kind: EntityKind::Task, .. }));
    assert_eq!(store.state().tasks.len(), 5);
}

#[test]
fn add_task_without_board_only_touches_list() {
    let mut store = TaskStore::bootstrap(None, false);
    store.add_task(Task::new("a", "Loose task", "1")).unwrap();
    assert_eq!(store.state().tasks.len(), 1);
    assert!(store.state().current_board.is_none());
}

#[test]
fn update_task_refreshes_updated_at() {
    let mut store = demo_store();
    let before = store.task(&"3".into()).unwrap().updated_at;
    let patch = TaskPatch {
        priority: Some(Priority::Urgent),
        ..TaskPatch::default()
    };
    store.update_task(&"3".into(), &patch).unwrap();
    store.update_task(&"3".into(), &patch).unwrap();

    let task = store.task(&"3".into()).unwrap();
    assert_eq!(task.priority, Priority::Urgent);
    assert!(task.updated_at > before);
}

#[test]
fn update_task_status_repairs_columns() {
    let mut store = demo_store();
    store
        .update_task(&"3".into(), &TaskPatch::status(Status::Todo))
        .unwrap();
    assert_eq!(column(&store, Status::Todo), ["1", "5", "3"]);
    assert!(column(&store, Status::Review).is_empty());
    assert_membership(&store);
}

#[test]
fn delete_task_removes_everywhere() {
    let mut store = demo_store();
    store.delete_task(&"2".into()).unwrap();
    assert!(store.task(&"2".into()).is_none());
    assert!(column(&store, Status::InProgress).is_empty());

    let version = store.version();
    let patch = TaskPatch {
        title: Some("ghost".to_string()),
        ..TaskPatch::default()
    };
    assert!(store.update_task(&"2".into(), &patch).is_err());
    assert_eq!(store.version(), version);
}

#[test]
fn assign_task_sets_assignee() {
    let mut store = demo_store();
    store.assign_task(&"1".into(), "4".into()).unwrap();
    assert_eq!(
        store.task(&"1".into()).unwrap().assignee_id.as_ref().unwrap().as_str(),
        "4"
    );
    let recent = views::recent_tasks_for(&store.state().tasks, &"4".into(), 5);
    assert_eq!(recent[0].id.as_str(), "1");
}

// ===========================================================================
// Projects and boards
// ===========================================================================

#[test]
fn rename_current_project_updates_both_copies() {
    let mut store = demo_store();
    store
        .update_project(&"1".into(), &ProjectPatch::rename("Renamed"))
        .unwrap();
    let state = store.state();
    assert_eq!(state.projects[0].name, "Renamed");
    assert_eq!(state.current_project.as_ref().unwrap().name, "Renamed");
}

#[test]
fn delete_project_keeps_tasks() {
    let mut store = demo_store();
    store.delete_project(&"1".into()).unwrap();
    assert!(store.state().projects.is_empty());
    assert!(store.state().current_project.is_none());
    assert_eq!(store.state().tasks.len(), 5);
}

#[test]
fn set_board_reconciles_membership() {
    let mut store = demo_store();
    let mut edited = board(&store).clone();
    // Task 1 in the wrong column, a dangling id, and a duplicate.
    edited.column_mut(Status::Todo).unwrap().task_ids.retain(|id| id.as_str() != "1");
    let done = edited.column_mut(Status::Done).unwrap();
    done.task_ids.push("1".into());
    done.task_ids.push("ghost".into());
    done.task_ids.push("4".into());
    store.update_board(edited);

    assert_eq!(column(&store, Status::Done), ["4"]);
    assert!(column(&store, Status::Todo).contains(&"1"));
    assert_membership(&store);
}

#[test]
fn board_view_resolves_tasks_in_column_order() {
    let store = demo_store();
    let view = store.board_view().unwrap();
    let titles: Vec<&str> = view.iter().map(|c| c.column.title.as_str()).collect();
    assert_eq!(titles, ["To Do", "In Progress", "Review", "Done"]);
    assert_eq!(view[0].tasks[1].title, "Mobile app optimization");
}

// ===========================================================================
// Filters and subscribers
// ===========================================================================

#[test]
fn filters_never_shrink_the_collection() {
    let mut store = demo_store();
    store.set_filters(TaskFilters {
        search: Some("API".to_string()),
        ..Default::default()
    });
    assert_eq!(store.state().tasks.len(), 5);
    let visible: Vec<&str> = views::visible_tasks(store.state())
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(visible, ["2", "4"]);

    store.clear_filters();
    assert!(store.state().filters.is_empty());
}

#[test]
fn subscribers_see_each_commit_in_order() {
    let mut store = demo_store();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&seen);
    let id = store.subscribe(move |state| {
        first.lock().unwrap().push(("first", state.tasks.len()));
    });
    let second = Arc::clone(&seen);
    store.subscribe(move |state| {
        second.lock().unwrap().push(("second", state.tasks.len()));
    });

    store.delete_task(&"5".into()).unwrap();
    let _ = store.delete_task(&"5".into());
    assert!(store.unsubscribe(id));
    store.set_loading(true);

    assert_eq!(
        *seen.lock().unwrap(),
        [("first", 4), ("second", 4), ("second", 4)]
    );
}

#[test]
fn shared_store_serializes_threads() {
    let shared = SharedTaskStore::new(demo_store());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                shared
                    .with(|s| s.add_task(Task::new(format!("t{n}").as_str(), "parallel", "1")))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.tasks.len(), 9);
    let todo = snapshot
        .current_board
        .as_ref()
        .and_then(|b| b.column(Status::Todo))
        .unwrap();
    assert_eq!(todo.task_ids.len(), 6);
}
