use std::fmt;

use thiserror::Error;

use crate::{
    listing::Listing,
    tasks::{Task, TaskStatus},
};

/// Maximum task text length, counted in Unicode code points.
pub const MAX_CONTENT_CHARS: usize = 200;

/// One already-parsed user command. Ids are kept as raw text so the
/// task list decides what counts as a valid id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { content: String },
    Edit { id: String, content: String },
    Toggle { id: String },
    Delete { id: String },
    ClearAll,
    CompleteAll,
}

impl Command {
    /// Stable operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Add { .. } => "add",
            Command::Edit { .. } => "edit",
            Command::Toggle { .. } => "toggle",
            Command::Delete { .. } => "delete",
            Command::ClearAll => "clear-all",
            Command::CompleteAll => "complete-all",
        }
    }

    /// Commands that never change the collection and need no save.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::List)
    }
}

/// Successful result of a task-list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(Vec<Task>),
    Added { id: u64, content: String },
    Toggled { id: u64, status: TaskStatus },
    Edited { id: u64, content: String },
    Deleted { id: u64 },
    Cleared { removed: usize },
    CompletedAll { completed: usize },
}

impl Outcome {
    /// Task affected by the operation, if it targets a single one.
    pub fn task_id(&self) -> Option<u64> {
        match self {
            Outcome::Added { id, .. }
            | Outcome::Toggled { id, .. }
            | Outcome::Edited { id, .. }
            | Outcome::Deleted { id } => Some(*id),
            Outcome::Listed(_) | Outcome::Cleared { .. } | Outcome::CompletedAll { .. } => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Listed(tasks) => write!(f, "{}", Listing::new(tasks)),
            Outcome::Added { id, content } => write!(f, "Added task {id}: {content}"),
            Outcome::Toggled { id, status } => {
                write!(f, "Task #{id} marked as {}", status.label())
            }
            Outcome::Edited { id, content } => write!(f, "Task #{id} updated: {content}"),
            Outcome::Deleted { id } => write!(f, "Task #{id} deleted"),
            Outcome::Cleared { removed } => write!(f, "All tasks cleared ({removed} removed)"),
            Outcome::CompletedAll { completed: 0 } => f.write_str("No pending tasks to complete"),
            Outcome::CompletedAll { completed } => {
                write!(f, "All tasks marked as done ({completed} completed)")
            }
        }
    }
}

/// Content rule broken by `add` or `edit`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("task text must not be empty")]
    EmptyContent,
    #[error("task text must not exceed {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
    #[error("task #{existing_id} already has this text")]
    Duplicate { existing_id: u64 },
}

/// Recoverable refusal of a command. Nothing is mutated when one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("invalid task id: {raw:?}")]
    InvalidId { raw: String },
    #[error("task #{id} not found")]
    NotFound { id: u64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no task ids left; run clear-all to start numbering again")]
    IdsExhausted,
}

impl Rejection {
    pub fn task_id(&self) -> Option<u64> {
        match self {
            Rejection::NotFound { id } => Some(*id),
            Rejection::Validation(ValidationError::Duplicate { existing_id }) => {
                Some(*existing_id)
            }
            _ => None,
        }
    }
}
