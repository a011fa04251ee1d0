use std::io::Write;

use color_eyre::Result;
use tasker_core::{
    command::{Command, Outcome},
    storage::TaskStore,
};
use tasker_task::TaskList;
use tracing::{error, info, warn};

/// How a task command ended when no fatal error occurred.
/// Target of the per-command result events. The log file records them; the
/// console layer drops them because the user already sees the printed result.
pub const OUTCOME_TARGET: &str = "tasker::outcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    Rejected,
}

/// Execute one task command: load, apply, save when something changed, report.
/// Rejections are printed to `err` and leave the store untouched; store
/// failures are returned.
pub fn handle<S: TaskStore>(
    command: Command,
    store: &S,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<Disposition> {
    let op = command.name();
    let read_only = command.is_read_only();

    let tasks = store
        .load()
        .inspect_err(|e| error!(target: OUTCOME_TARGET, op, error = %e, "failed to load tasks"))?;
    let mut list = TaskList::new(tasks);

    match list.apply(command) {
        Ok(outcome) => {
            if !read_only {
                store
                    .save(list.collection())
                    .inspect_err(|e| {
                        error!(target: OUTCOME_TARGET, op, error = %e, "failed to save tasks")
                    })?;
            }
            info!(
                target: OUTCOME_TARGET,
                op,
                id = outcome.task_id(),
                "{}",
                summary(&outcome)
            );
            writeln!(out, "{outcome}")?;
            Ok(Disposition::Applied)
        }
        Err(rejection) => {
            warn!(
                target: OUTCOME_TARGET,
                op,
                id = rejection.task_id(),
                reason = %rejection,
                "command rejected"
            );
            writeln!(err, "error: {rejection}")?;
            Ok(Disposition::Rejected)
        }
    }
}

/// One-line log message; listings are summarized instead of dumped.
fn summary(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Listed(tasks) if tasks.is_empty() => "task list is empty".to_string(),
        Outcome::Listed(tasks) => format!("listed {} tasks", tasks.len()),
        other => other.to_string(),
    }
}
