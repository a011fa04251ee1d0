use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "tasker",
    about = "Track short to-do items in a local JSON file",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Task file to use instead of the configured one (default: ./tasks.json).
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Log file to append to instead of the configured one (default: ./app.log).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    Task(TaskCommand),
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Show all tasks.
    List,
    /// Add a task. Words are joined with single spaces.
    Add {
        #[arg(required = true, num_args = 1.., value_name = "TEXT")]
        text: Vec<String>,
    },
    /// Replace the text of a task.
    Edit {
        #[arg(allow_negative_numbers = true)]
        id: String,
        #[arg(required = true, num_args = 1.., value_name = "TEXT")]
        text: Vec<String>,
    },
    /// Flip a task between done and not done.
    Toggle {
        #[arg(allow_negative_numbers = true)]
        id: String,
    },
    /// Remove a task.
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: String,
    },
    /// Remove every task and restart numbering at 1.
    ClearAll,
    /// Mark every pending task as done.
    CompleteAll,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

impl From<TaskCommand> for tasker_core::command::Command {
    fn from(cmd: TaskCommand) -> Self {
        use tasker_core::command::Command as Core;
        match cmd {
            TaskCommand::List => Core::List,
            TaskCommand::Add { text } => Core::Add {
                content: text.join(" "),
            },
            TaskCommand::Edit { id, text } => Core::Edit {
                id,
                content: text.join(" "),
            },
            TaskCommand::Toggle { id } => Core::Toggle { id },
            TaskCommand::Delete { id } => Core::Delete { id },
            TaskCommand::ClearAll => Core::ClearAll,
            TaskCommand::CompleteAll => Core::CompleteAll,
        }
    }
}
