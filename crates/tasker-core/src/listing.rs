use std::fmt;

use crate::tasks::{Task, TIMESTAMP_FORMAT};

/// Printable view over a slice of tasks. Lines are rendered on demand from
/// the borrowed tasks, so a listing always reflects their current state.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    tasks: &'a [Task],
}

impl<'a> Listing<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// One rendered line per task, in collection order.
    pub fn lines(&self) -> impl Iterator<Item = String> + 'a {
        self.tasks.iter().map(render_line)
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Task list is empty");
        }
        f.write_str("Tasks:")?;
        for line in self.lines() {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

fn render_line(task: &Task) -> String {
    let mark = if task.is_done() { 'x' } else { ' ' };
    let created = task.created_at().format(TIMESTAMP_FORMAT);
    match task.completed_at().filter(|_| task.is_done()) {
        Some(done_at) => format!(
            "{:>3} [{mark}] {} (created {created}, completed {})",
            task.id(),
            task.content(),
            done_at.format(TIMESTAMP_FORMAT)
        ),
        None => format!(
            "{:>3} [{mark}] {} (created {created})",
            task.id(),
            task.content()
        ),
    }
}
