//! CLI subcommands executed against a loaded [`TaskStore`].
//!
//! Each command applies its mutation through the store and returns the text
//! to print. Rendering is plain text so output can be piped.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_model::{Status, Task, TaskFilters, TaskId, TaskPatch, UserId};

use crate::config::{AddArgs, Command, ListArgs, TaskboardConfig, UpdateArgs};
use crate::store::{EntityKind, StoreError, TaskStore};
use crate::views;

/// Maximum task title length, in characters.
pub const MAX_TITLE_LEN: usize = 256;

/// Errors from running a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("task title too long ({len} chars, max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("no current user; pass --user")]
    NoCurrentUser,

    #[error("failed to render task: {0}")]
    Render(#[from] serde_json::Error),
}

/// Runs `command` and returns its printable output.
///
/// `Reset` only reports; wiping storage is left to the caller.
///
/// # Errors
///
/// Returns [`CommandError`] on invalid input or when the store rejects the
/// operation. The store is unchanged in that case.
pub fn execute(
    store: &mut TaskStore,
    command: &Command,
    config: &TaskboardConfig,
    now: DateTime<Utc>,
) -> Result<String, CommandError> {
    match command {
        Command::Board => Ok(render_board(store)),
        Command::List(args) => list(store, args),
        Command::Stats => Ok(render_stats(store, config.recent_limit, now)),
        Command::Show { id } => {
            let id = TaskId::from(id.as_str());
            let task = store.task(&id).ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::Task,
                id: id.to_string(),
            })?;
            Ok(serde_json::to_string_pretty(task)?)
        }
        Command::Add(args) => add(store, args),
        Command::Move { id, status, index } => {
            let id = TaskId::from(id.as_str());
            store.move_task(&id, *status, *index)?;
            Ok(format!("moved {id} to {status}"))
        }
        Command::Assign { id, user } => {
            let id = TaskId::from(id.as_str());
            let user = UserId::from(user.as_str());
            require_user(store, &user)?;
            store.assign_task(&id, user.clone())?;
            Ok(format!("assigned {id} to {user}"))
        }
        Command::Update(args) => update(store, args),
        Command::Delete { id } => {
            let id = TaskId::from(id.as_str());
            store.delete_task(&id)?;
            Ok(format!("deleted {id}"))
        }
        Command::Users => Ok(render_users(store)),
        Command::Reset => Ok("saved state cleared".to_string()),
    }
}

fn parse_day(value: &str) -> Result<DateTime<Utc>, CommandError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| {
        CommandError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn require_user(store: &TaskStore, id: &UserId) -> Result<(), StoreError> {
    if store.state().users.iter().any(|u| &u.id == id) {
        Ok(())
    } else {
        Err(StoreError::NotFound {
            kind: EntityKind::User,
            id: id.to_string(),
        })
    }
}

fn validate_title(title: &str) -> Result<(), CommandError> {
    if title.trim().is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(CommandError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

fn non_empty<T>(values: &[T]) -> Option<Vec<T>>
where
    T: Clone,
{
    (!values.is_empty()).then(|| values.to_vec())
}

fn list(store: &mut TaskStore, args: &ListArgs) -> Result<String, CommandError> {
    let mut assignees: Vec<UserId> = args.assignees.iter().map(|a| a.as_str().into()).collect();
    if args.mine {
        let me = store
            .state()
            .current_user
            .as_ref()
            .ok_or(CommandError::NoCurrentUser)?;
        assignees.push(me.id.clone());
    }

    let filters = TaskFilters {
        status: non_empty(&args.statuses),
        priority: non_empty(&args.priorities),
        assignee_id: non_empty(&assignees),
        tags: non_empty(&args.tags),
        search: args.search.clone().filter(|s| !s.is_empty()),
        due_date_from: args.due_from.as_deref().map(parse_day).transpose()?,
        due_date_to: args.due_to.as_deref().map(parse_day).transpose()?,
    };
    store.set_filters(filters);

    let state = store.state();
    let visible = views::visible_tasks(state);
    if visible.is_empty() {
        return Ok("no matching tasks".to_string());
    }
    let mut out = String::new();
    for task in visible {
        let _ = writeln!(out, "{}", task_line(task));
    }
    Ok(out)
}

fn add(store: &mut TaskStore, args: &AddArgs) -> Result<String, CommandError> {
    validate_title(&args.title)?;
    let creator = store
        .state()
        .current_user
        .as_ref()
        .map(|u| u.id.clone())
        .ok_or(CommandError::NoCurrentUser)?;

    let mut task = Task::new(TaskId::generate(), args.title.trim(), creator);
    task.description.clone_from(&args.description);
    if let Some(status) = args.status {
        task.status = status;
    }
    if let Some(priority) = args.priority {
        task.priority = priority;
    }
    if let Some(assignee) = args.assignee.as_deref().map(UserId::from) {
        require_user(store, &assignee)?;
        task.assignee_id = Some(assignee);
    }
    task.tags = args.tags.iter().cloned().collect::<BTreeSet<_>>();
    task.due_date = args.due.as_deref().map(parse_day).transpose()?;
    task.estimated_hours = args.estimate;

    let id = task.id.clone();
    store.add_task(task)?;
    Ok(format!("added {id}"))
}

fn update(store: &mut TaskStore, args: &UpdateArgs) -> Result<String, CommandError> {
    if let Some(title) = &args.title {
        validate_title(title)?;
    }
    let patch = TaskPatch {
        title: args.title.as_deref().map(|t| t.trim().to_string()),
        description: args.description.clone().map(Some),
        status: args.status,
        priority: args.priority,
        assignee_id: args.unassign.then_some(None),
        due_date: args.due.as_deref().map(parse_day).transpose()?.map(Some),
        actual_hours: args.actual.map(Some),
        ..TaskPatch::default()
    };
    let id = TaskId::from(args.id.as_str());
    store.update_task(&id, &patch)?;
    Ok(format!("updated {id}"))
}

fn task_line(task: &Task) -> String {
    let assignee = task.assignee_id.as_ref().map_or("-", UserId::as_str);
    let tags = if task.tags.is_empty() {
        String::new()
    } else {
        let joined: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        format!(" [{}]", joined.join(", "))
    };
    format!(
        "{:<8} {:<12} {:<7} @{:<4} {}{}",
        short_id(&task.id),
        task.status.to_string(),
        task.priority.to_string(),
        assignee,
        task.title,
        tags
    )
}

/// Generated ids are long UUIDs; show enough to tell them apart.
fn short_id(id: &TaskId) -> &str {
    let s = id.as_str();
    s.get(..8).unwrap_or(s)
}

fn render_board(store: &TaskStore) -> String {
    let state = store.state();
    let Some(columns) = store.board_view() else {
        return "no board loaded".to_string();
    };

    let mut out = String::new();
    if let Some(project) = &state.current_project {
        let _ = writeln!(out, "{}", project.name);
    }
    for view in columns {
        let _ = writeln!(out, "\n== {} ({}) ==", view.column.title, view.tasks.len());
        for task in view.tasks {
            let _ = writeln!(out, "  {}", task_line(task));
        }
    }

    let unplaced = state
        .tasks
        .iter()
        .filter(|t| state.current_board.as_ref().is_some_and(|b| b.column_of(&t.id).is_none()))
        .count();
    if unplaced > 0 {
        let _ = writeln!(out, "\n({unplaced} task(s) not on this board)");
    }
    out
}

fn render_stats(store: &TaskStore, recent_limit: usize, now: DateTime<Utc>) -> String {
    let state = store.state();
    let stats = views::dashboard_stats(state, now);
    let mut out = String::new();
    let _ = writeln!(out, "tasks        {}", stats.total);
    let _ = writeln!(out, "mine         {}", stats.mine);
    for status in Status::ALL {
        let count = match status {
            Status::Todo => stats.todo,
            Status::InProgress => stats.in_progress,
            Status::Review => stats.review,
            Status::Done => stats.done,
        };
        let _ = writeln!(out, "{:<12} {count}", status.title().to_lowercase());
    }
    let _ = writeln!(out, "urgent open  {}", stats.urgent_open);
    let _ = writeln!(out, "overdue      {}", stats.overdue);
    let _ = writeln!(out, "members      {}", stats.members);
    let _ = writeln!(out, "completion   {}%", stats.completion_percent);

    if let Some(me) = &state.current_user {
        let recent = views::recent_tasks_for(&state.tasks, &me.id, recent_limit);
        let _ = writeln!(out, "\nrecent for {}:", me.name);
        if recent.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for task in recent {
            let _ = writeln!(out, "  {}", task_line(task));
        }
    }
    out
}

fn render_users(store: &TaskStore) -> String {
    let state = store.state();
    let me = state.current_user.as_ref().map(|u| &u.id);
    let mut out = String::new();
    for user in &state.users {
        let marker = if Some(&user.id) == me { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<4} {:<16} {:<8} {}",
            user.id.as_str(),
            user.name,
            user.role.to_string(),
            user.email
        );
    }
    out
}
