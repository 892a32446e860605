//! Fixed demo dataset used when nothing has been saved yet.
//!
//! Four users, one project, one four-column board and five tasks with
//! statuses `[todo, in-progress, review, done, todo]`.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_model::{AppState, Board, Priority, Project, Role, Status, Task, User};

use crate::store::board;

const AVATAR_PARAMS: &str = "w=32&h=32&fit=crop&crop=face&auto=format";

/// Midnight UTC on the given day.
fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn user(id: &str, name: &str, email: &str, role: Role, photo: &str) -> User {
    let mut user = User::new(id, name, email, role);
    user.avatar = Some(format!(
        "https://images.unsplash.com/photo-{photo}?{AVATAR_PARAMS}"
    ));
    user
}

/// Demo users. The first one is the default current user.
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user("1", "John Doe", "john@omniaa.dev", Role::Admin, "1472099645785-5658abf4ff4e"),
        user("2", "Jane Smith", "jane@omniaa.dev", Role::Manager, "1494790108755-2616b612b5bc"),
        user("3", "Mike Johnson", "mike@omniaa.dev", Role::Member, "1507003211169-0a1dd7228f2d"),
        user("4", "Sarah Wilson", "sarah@omniaa.dev", Role::Member, "1438761681033-6461ffad8d80"),
    ]
}

struct Seed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    status: Status,
    priority: Priority,
    assignee: &'static str,
    creator: &'static str,
    created: (u32, u32),
    updated: (u32, u32),
    due: (u32, u32),
    tags: &'static [&'static str],
    estimated: f64,
    actual: Option<f64>,
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: "1",
        title: "Design new landing page",
        description: "Create a modern, responsive landing page for the new product launch. \
                      Include hero section, features, and call-to-action.",
        status: Status::Todo,
        priority: Priority::High,
        assignee: "2",
        creator: "1",
        created: (1, 15),
        updated: (1, 15),
        due: (2, 1),
        tags: &["design", "frontend", "urgent"],
        estimated: 16.0,
        actual: None,
    },
    Seed {
        id: "2",
        title: "Implement user authentication",
        description: "Add login, registration, and password reset functionality using JWT tokens.",
        status: Status::InProgress,
        priority: Priority::Medium,
        assignee: "3",
        creator: "1",
        created: (1, 10),
        updated: (1, 18),
        due: (1, 25),
        tags: &["backend", "security", "api"],
        estimated: 12.0,
        actual: Some(8.0),
    },
    Seed {
        id: "3",
        title: "Setup CI/CD pipeline",
        description: "Configure GitHub Actions for automated testing and deployment to \
                      staging and production environments.",
        status: Status::Review,
        priority: Priority::Medium,
        assignee: "4",
        creator: "2",
        created: (1, 8),
        updated: (1, 20),
        due: (1, 22),
        tags: &["devops", "automation", "deployment"],
        estimated: 8.0,
        actual: Some(6.0),
    },
    Seed {
        id: "4",
        title: "Write API documentation",
        description: "Create comprehensive API documentation using OpenAPI/Swagger specifications.",
        status: Status::Done,
        priority: Priority::Low,
        assignee: "3",
        creator: "2",
        created: (1, 5),
        updated: (1, 12),
        due: (1, 15),
        tags: &["documentation", "api"],
        estimated: 4.0,
        actual: Some(5.0),
    },
    Seed {
        id: "5",
        title: "Mobile app optimization",
        description: "Optimize the mobile application for better performance and user \
                      experience on iOS and Android.",
        status: Status::Todo,
        priority: Priority::Medium,
        assignee: "4",
        creator: "1",
        created: (1, 20),
        updated: (1, 20),
        due: (2, 5),
        tags: &["mobile", "performance", "optimization"],
        estimated: 20.0,
        actual: None,
    },
];

/// Demo tasks, in creation-list order.
#[must_use]
pub fn tasks() -> Vec<Task> {
    SEEDS
        .iter()
        .map(|seed| {
            let mut task = Task::new(seed.id, seed.title, seed.creator);
            task.description = Some(seed.description.to_string());
            task.status = seed.status;
            task.priority = seed.priority;
            task.assignee_id = Some(seed.assignee.into());
            task.created_at = day(2024, seed.created.0, seed.created.1);
            task.updated_at = day(2024, seed.updated.0, seed.updated.1);
            task.due_date = Some(day(2024, seed.due.0, seed.due.1));
            task.tags = seed.tags.iter().map(|t| (*t).to_string()).collect::<BTreeSet<_>>();
            task.estimated_hours = Some(seed.estimated);
            task.actual_hours = seed.actual;
            task
        })
        .collect()
}

/// The demo project, embedding all demo users and tasks.
#[must_use]
pub fn project() -> Project {
    let mut project = Project::new("1", "Omniaa Platform V2", "1");
    project.description = Some(
        "Next generation AI platform with enhanced capabilities and user experience".to_string(),
    );
    project.color = "#0ea5e9".to_string();
    project.members = users();
    project.tasks = tasks();
    project.created_at = day(2024, 1, 1);
    project.updated_at = day(2024, 1, 20);
    project
}

/// The demo board with every demo task in its status column.
#[must_use]
pub fn board() -> Board {
    let mut board = Board::standard("1", "Main Board", "1", day(2024, 1, 1));
    board.updated_at = day(2024, 1, 20);
    board::populate(&mut board, &tasks());
    board
}

/// Loads the demo project, board and tasks into `state`, replacing those.
/// Demo users are added only when `state` has none.
pub fn seed(state: &mut AppState) {
    if state.users.is_empty() {
        state.users = users();
    }
    let project = project();
    state.projects = vec![project.clone()];
    state.current_project = Some(project);
    state.current_board = Some(board());
    state.tasks = tasks();
}
