//! Task-list operations over an owned [`TaskCollection`].

pub mod validation;

use tasker_core::{
    clock::{Clock, SystemClock},
    command::{Command, Outcome, Rejection},
    listing::Listing,
    tasks::TaskCollection,
};
use tracing::{debug, instrument};

pub use validation::parse_id;

/// Exclusive owner of the collection while one command runs. Hand the
/// collection back with [`TaskList::into_collection`] to persist it.
#[derive(Debug)]
pub struct TaskList<C: Clock = SystemClock> {
    tasks: TaskCollection,
    clock: C,
}

impl TaskList {
    pub fn new(tasks: TaskCollection) -> Self {
        Self::with_clock(tasks, SystemClock)
    }
}

impl<C: Clock> TaskList<C> {
    pub fn with_clock(tasks: TaskCollection, clock: C) -> Self {
        Self { tasks, clock }
    }

    pub fn collection(&self) -> &TaskCollection {
        &self.tasks
    }

    pub fn into_collection(self) -> TaskCollection {
        self.tasks
    }

    /// Run one parsed command.
    #[instrument(skip_all, fields(op = command.name()))]
    pub fn apply(&mut self, command: Command) -> Result<Outcome, Rejection> {
        let result = match command {
            Command::List => Ok(Outcome::Listed(self.tasks.tasks().to_vec())),
            Command::Add { content } => self.add(&content),
            Command::Edit { id, content } => self.edit(&id, &content),
            Command::Toggle { id } => self.toggle(&id),
            Command::Delete { id } => self.delete(&id),
            Command::ClearAll => Ok(self.clear_all()),
            Command::CompleteAll => Ok(self.complete_all()),
        };
        match &result {
            Ok(outcome) => debug!(id = ?outcome.task_id(), "applied"),
            Err(rejection) => debug!(%rejection, "rejected"),
        }
        result
    }

    /// View of every task in order, rendered from the current state.
    pub fn list(&self) -> Listing<'_> {
        Listing::new(self.tasks.tasks())
    }

    /// Checks run in order: empty, too long, duplicate.
    pub fn add(&mut self, content: &str) -> Result<Outcome, Rejection> {
        let content = validation::content(content)?;
        validation::ensure_unique(&self.tasks, &content, None)?;

        let task = self
            .tasks
            .push(content, self.clock.now())
            .ok_or(Rejection::IdsExhausted)?;
        Ok(Outcome::Added {
            id: task.id(),
            content: task.content().to_string(),
        })
    }

    pub fn toggle(&mut self, raw_id: &str) -> Result<Outcome, Rejection> {
        let id = parse_id(raw_id)?;
        let now = self.clock.now();
        let task = self.tasks.get_mut(id).ok_or(Rejection::NotFound { id })?;
        Ok(Outcome::Toggled {
            id,
            status: task.toggle(now),
        })
    }

    /// Same content checks as `add`, but a task never duplicates itself, so
    /// changing only the letter case of its own text is allowed.
    pub fn edit(&mut self, raw_id: &str, content: &str) -> Result<Outcome, Rejection> {
        let id = parse_id(raw_id)?;
        if self.tasks.get(id).is_none() {
            return Err(Rejection::NotFound { id });
        }
        let content = validation::content(content)?;
        validation::ensure_unique(&self.tasks, &content, Some(id))?;

        let task = self.tasks.get_mut(id).ok_or(Rejection::NotFound { id })?;
        task.set_content(content.clone());
        Ok(Outcome::Edited { id, content })
    }

    pub fn delete(&mut self, raw_id: &str) -> Result<Outcome, Rejection> {
        let id = parse_id(raw_id)?;
        self.tasks
            .remove(id)
            .map(|_| Outcome::Deleted { id })
            .ok_or(Rejection::NotFound { id })
    }

    pub fn clear_all(&mut self) -> Outcome {
        Outcome::Cleared {
            removed: self.tasks.clear(),
        }
    }

    /// Complete every pending task with one shared timestamp.
    pub fn complete_all(&mut self) -> Outcome {
        let now = self.clock.now();
        let mut completed = 0;
        for task in self.tasks.iter_mut() {
            if task.complete(now) {
                completed += 1;
            }
        }
        Outcome::CompletedAll { completed }
    }
}
