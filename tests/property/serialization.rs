//! Property-based tests for the persisted record codecs.
//!
//! Uses proptest to verify:
//! 1. Any `PersistedState` survives encode → decode in both formats.
//! 2. Random bytes never cause a panic in `decode` (returns `Err` gracefully).
//! 3. Model enums parse back from their display form.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use taskboard_model::codec::{self, Format};
use taskboard_model::state::PERSISTED_STATE_VERSION;
use taskboard_model::{
    Attachment, Comment, PersistedState, Priority, Project, Role, Status, Task, User,
};

// --- Strategies for model types ---

/// Whole-second to nanosecond precision instants between 1970 and ~2096.
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0_i64..4_000_000_000, 0_u32..1_000_000_000)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
}

fn arb_status() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(vec![
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ])
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![Role::Admin, Role::Manager, Role::Member])
}

/// Quarter hours, exactly representable in both codecs.
fn arb_hours() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((0_u32..400).prop_map(|q| f64::from(q) / 4.0))
}

fn arb_user() -> impl Strategy<Value = User> {
    (
        "[a-z0-9]{1,8}",
        ".{0,24}",
        "[a-z]{1,8}@[a-z]{1,8}\\.dev",
        arb_role(),
        prop::option::of(".{0,32}"),
    )
        .prop_map(|(id, name, email, role, avatar)| {
            let mut user = User::new(id.as_str(), &name, &email, role);
            user.avatar = avatar;
            user
        })
}

fn arb_comment() -> impl Strategy<Value = Comment> {
    (
        "[a-z0-9]{1,8}",
        ".{0,64}",
        "[0-9]{1,2}",
        arb_instant(),
        prop::option::of(arb_instant()),
    )
        .prop_map(|(id, content, author, created_at, updated_at)| Comment {
            id: id.into(),
            content,
            author_id: author.into(),
            created_at,
            updated_at,
        })
}

fn arb_attachment() -> impl Strategy<Value = Attachment> {
    (
        "[a-z0-9]{1,8}",
        ".{1,24}",
        any::<u64>(),
        "[a-z]{1,8}/[a-z]{1,8}",
        arb_instant(),
    )
        .prop_map(|(id, name, size, mime_type, uploaded_at)| Attachment {
            id: id.into(),
            url: format!("https://files.example.dev/{name}"),
            name,
            size,
            mime_type,
            uploaded_by_id: "1".into(),
            uploaded_at,
        })
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-z0-9-]{1,36}",
        ".{1,80}",
        prop::option::of(".{0,200}"),
        arb_status(),
        arb_priority(),
        prop::option::of("[0-9]{1,2}"),
        (arb_instant(), arb_instant(), prop::option::of(arb_instant())),
        prop::collection::btree_set("[a-z]{1,10}", 0..5),
        prop::collection::vec(arb_comment(), 0..3),
        prop::collection::vec(arb_attachment(), 0..2),
        (arb_hours(), arb_hours()),
    )
        .prop_map(
            |(
                id,
                title,
                description,
                status,
                priority,
                assignee,
                (created_at, updated_at, due_date),
                tags,
                comments,
                attachments,
                (estimated_hours, actual_hours),
            )| {
                let mut task = Task::new(id.as_str(), &title, "1");
                task.description = description;
                task.status = status;
                task.priority = priority;
                task.assignee_id = assignee.map(Into::into);
                task.created_at = created_at;
                task.updated_at = updated_at;
                task.due_date = due_date;
                task.tags = tags;
                task.comments = comments;
                task.attachments = attachments;
                task.estimated_hours = estimated_hours;
                task.actual_hours = actual_hours;
                task
            },
        )
}

fn arb_project() -> impl Strategy<Value = Project> {
    (
        "[a-z0-9]{1,8}",
        ".{1,40}",
        prop::option::of(".{0,80}"),
        prop::collection::vec(arb_user(), 0..3),
        prop::collection::vec(arb_task(), 0..3),
        arb_instant(),
    )
        .prop_map(|(id, name, description, members, tasks, at)| {
            let mut project = Project::new(id.as_str(), &name, "1");
            project.description = description;
            project.members = members;
            project.tasks = tasks;
            project.created_at = at;
            project.updated_at = at;
            project
        })
}

fn arb_record() -> impl Strategy<Value = PersistedState> {
    (
        prop::option::of(arb_user()),
        prop::collection::vec(arb_user(), 0..4),
        prop::collection::vec(arb_project(), 0..2),
        prop::collection::vec(arb_task(), 0..6),
    )
        .prop_map(|(current_user, users, projects, tasks)| PersistedState {
            version: PERSISTED_STATE_VERSION,
            current_user,
            users,
            projects,
            tasks,
        })
}

fn arb_format() -> impl Strategy<Value = Format> {
    prop::sample::select(vec![Format::Json, Format::Binary])
}

// --- Properties ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn record_round_trip(record in arb_record(), format in arb_format()) {
        let bytes = codec::encode(format, &record).expect("encode should succeed");
        let decoded = codec::decode(format, &bytes).expect("decode should succeed");
        prop_assert_eq!(record, decoded);
    }

    #[test]
    fn task_json_uses_wire_names(task in arb_task()) {
        let value = serde_json::to_value(&task).unwrap();
        prop_assert!(value.get("createdById").is_some());
        prop_assert!(value.get("updatedAt").is_some());
        let status = task.status.to_string();
        prop_assert_eq!(value["status"].as_str(), Some(status.as_str()));
    }

    #[test]
    fn decode_random_bytes_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = codec::decode(Format::Json, &data);
        let _ = codec::decode(Format::Binary, &data);
    }

    #[test]
    fn status_display_parses_back(status in arb_status()) {
        prop_assert_eq!(status.to_string().parse::<Status>().unwrap(), status);
    }

    #[test]
    fn priority_display_parses_back(priority in arb_priority()) {
        prop_assert_eq!(priority.to_string().parse::<Priority>().unwrap(), priority);
    }
}
