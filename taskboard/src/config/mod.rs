//! Configuration system for the `taskboard` CLI.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;

use taskboard_model::{Format, Priority, Status};

use crate::views::DEFAULT_RECENT_LIMIT;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    session: SessionFileConfig,
    views: ViewsFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    format: Option<Format>,
    enabled: Option<bool>,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    current_user: Option<String>,
    seed_demo: Option<bool>,
}

/// `[views]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ViewsFileConfig {
    recent_limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskboardConfig {
    /// Directory holding the saved state record.
    pub data_dir: PathBuf,
    /// Encoding of the saved state record.
    pub format: Format,
    /// Whether state is loaded from and saved to `data_dir` at all.
    pub persist: bool,
    /// User id to act as, overriding the saved current user.
    pub current_user: Option<String>,
    /// Load the demo dataset when nothing has been saved.
    pub seed_demo: bool,
    /// Length of the "recent tasks" list.
    pub recent_limit: usize,
}

impl Default for TaskboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            format: Format::Json,
            persist: true,
            current_user: None,
            seed_demo: true,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || std::env::temp_dir().join("taskboard"),
        |dir| dir.join("taskboard"),
    )
}

impl TaskboardConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read,
    /// or if any config file that exists cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve from CLI args and a parsed config file. Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            format: cli
                .format
                .or(file.storage.format)
                .unwrap_or(defaults.format),
            persist: !cli.ephemeral && file.storage.enabled.unwrap_or(defaults.persist),
            current_user: cli
                .user
                .clone()
                .or_else(|| file.session.current_user.clone()),
            seed_demo: !cli.no_demo && file.session.seed_demo.unwrap_or(defaults.seed_demo),
            recent_limit: file
                .views
                .recent_limit
                .unwrap_or(defaults.recent_limit),
        }
    }
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Kanban task board in the terminal")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the saved board state.
    #[arg(long, env = "TASKBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Saved state encoding (json, binary).
    #[arg(long)]
    pub format: Option<Format>,

    /// Act as this user id.
    #[arg(short, long, env = "TASKBOARD_USER")]
    pub user: Option<String>,

    /// Do not load the demo dataset when nothing is saved.
    #[arg(long)]
    pub no_demo: bool,

    /// Neither load nor save state.
    #[arg(long)]
    pub ephemeral: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once the store is loaded.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Default)]
pub enum Command {
    /// Show the board, one section per column.
    #[default]
    Board,

    /// List tasks matching the given filters.
    List(ListArgs),

    /// Show dashboard numbers and your most recent tasks.
    Stats,

    /// Print one task as JSON.
    Show {
        /// Task id.
        id: String,
    },

    /// Create a task.
    Add(AddArgs),

    /// Move a task to another column.
    Move {
        /// Task id.
        id: String,
        /// Destination status.
        status: Status,
        /// Position within the destination column (0 = top).
        #[arg(long)]
        index: Option<usize>,
    },

    /// Assign a task to a user.
    Assign {
        /// Task id.
        id: String,
        /// Assignee user id.
        user: String,
    },

    /// Change task fields.
    Update(UpdateArgs),

    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },

    /// List users.
    Users,

    /// Discard saved state.
    Reset,
}

/// Filters for `taskboard list`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct ListArgs {
    /// Only these statuses (repeatable).
    #[arg(long = "status")]
    pub statuses: Vec<Status>,
    /// Only these priorities (repeatable).
    #[arg(long = "priority")]
    pub priorities: Vec<Priority>,
    /// Only tasks assigned to these user ids (repeatable).
    #[arg(long = "assignee")]
    pub assignees: Vec<String>,
    /// Only tasks carrying any of these tags (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Case-insensitive text search.
    #[arg(long)]
    pub search: Option<String>,
    /// Earliest due date (YYYY-MM-DD).
    #[arg(long)]
    pub due_from: Option<String>,
    /// Latest due date (YYYY-MM-DD).
    #[arg(long)]
    pub due_to: Option<String>,
    /// Only tasks assigned to the current user.
    #[arg(long)]
    pub mine: bool,
}

/// Fields for `taskboard add`.
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct AddArgs {
    /// Task title.
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Assignee user id.
    #[arg(long)]
    pub assignee: Option<String>,
    /// Tag (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<String>,
    /// Estimated effort in hours.
    #[arg(long)]
    pub estimate: Option<f64>,
}

/// Fields for `taskboard update`. Only given fields change.
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct UpdateArgs {
    /// Task id.
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<String>,
    /// Actual effort in hours.
    #[arg(long)]
    pub actual: Option<f64>,
    /// Remove the assignee.
    #[arg(long)]
    pub unassign: bool,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskboard").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
