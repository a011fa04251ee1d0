use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Wall-clock format used for every stored timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Derived completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Human label used in outcome messages.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "not done",
            TaskStatus::Completed => "done",
        }
    }
}

/// Task entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    id: u64,
    content: String,
    #[serde(default)]
    done: bool,
    #[serde(with = "timestamp")]
    created_at: NaiveDateTime,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::optional"
    )]
    completed_at: Option<NaiveDateTime>,
}

impl Task {
    pub(crate) fn new(id: u64, content: String, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            content,
            done: false,
            created_at,
            completed_at: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn status(&self) -> TaskStatus {
        if self.done {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    /// Case-insensitive content comparison (Unicode lowercase).
    pub fn has_content(&self, other: &str) -> bool {
        self.content.to_lowercase() == other.to_lowercase()
    }

    /// Replace the text; id, timestamps and completion state are untouched.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Flip completion state and return the new status.
    pub fn toggle(&mut self, now: NaiveDateTime) -> TaskStatus {
        self.done = !self.done;
        self.completed_at = self.done.then_some(now);
        self.status()
    }

    /// Move a pending task to completed. Returns false if it was already done.
    pub fn complete(&mut self, now: NaiveDateTime) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        self.completed_at = Some(now);
        true
    }
}

/// The persisted aggregate: ordered tasks plus the id counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCollection {
    #[serde(default, deserialize_with = "null_as_empty")]
    tasks: Vec<Task>,
    #[serde(default)]
    next_id: u64,
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    /// Append a new pending task under the next id and advance the counter.
    /// Returns `None` without changing anything once the id space is used up.
    pub fn push(&mut self, content: String, created_at: NaiveDateTime) -> Option<&Task> {
        let following = self.next_id.checked_add(1)?;
        let task = Task::new(self.next_id, content, created_at);
        self.next_id = following;
        self.tasks.push(task);
        self.tasks.last()
    }

    /// Remove a task, keeping the order of the rest. The counter is not touched.
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Drop every task and restart numbering at 1. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        self.next_id = 1;
        removed
    }

    /// Reject duplicate or zero ids and bump `next_id` past the largest id.
    /// Returns whether the counter had to be repaired.
    pub(crate) fn normalize(&mut self) -> Result<bool, String> {
        let mut seen = std::collections::HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if task.id == 0 {
                return Err("task id 0 is not allowed".to_string());
            }
            if !seen.insert(task.id) {
                return Err(format!("task id {} appears more than once", task.id));
            }
        }

        let highest = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        let floor = highest
            .checked_add(1)
            .ok_or_else(|| format!("task id {highest} leaves no room for another id"))?;
        if self.next_id < floor {
            self.next_id = floor;
            return Ok(true);
        }
        Ok(false)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Task>>::deserialize(deserializer)?.unwrap_or_default())
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }

    /// Absent, `null` and `""` all read as no timestamp.
    pub mod optional {
        use chrono::NaiveDateTime;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        use super::TIMESTAMP_FORMAT;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(at) => super::serialize(at, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                    .map(Some)
                    .map_err(D::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let mut tasks = TaskCollection::new();
        assert_eq!(tasks.push("a".into(), at(9)).map(Task::id), Some(1));
        assert_eq!(tasks.push("b".into(), at(9)).map(Task::id), Some(2));
        assert_eq!(tasks.next_id(), 3);
    }

    #[test]
    fn push_refuses_when_ids_run_out() {
        let json = r#"{"tasks":[],"next_id":18446744073709551615}"#;
        let mut tasks: TaskCollection = serde_json::from_str(json).expect("parse");
        assert_eq!(tasks.normalize(), Ok(false));

        assert!(tasks.push("a".into(), at(9)).is_none());
        assert!(tasks.is_empty());
        assert_eq!(tasks.next_id(), u64::MAX);
    }

    #[test]
    fn remove_keeps_counter_and_order() {
        let mut tasks = TaskCollection::new();
        for text in ["a", "b", "c"] {
            tasks.push(text.into(), at(9));
        }
        let removed = tasks.remove(2).expect("task 2 exists");
        assert_eq!(removed.content(), "b");
        let ids: Vec<u64> = tasks.tasks().iter().map(Task::id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(tasks.next_id(), 4);
        assert!(tasks.remove(2).is_none());
    }

    #[test]
    fn toggle_sets_and_clears_completion() {
        let mut tasks = TaskCollection::new();
        tasks.push("a".into(), at(9));
        let task = tasks.get_mut(1).expect("task");

        assert_eq!(task.toggle(at(10)), TaskStatus::Completed);
        assert_eq!(task.completed_at(), Some(at(10)));
        assert_eq!(task.toggle(at(11)), TaskStatus::Pending);
        assert_eq!(task.completed_at(), None);
    }

    #[test]
    fn complete_leaves_done_tasks_alone() {
        let mut tasks = TaskCollection::new();
        tasks.push("a".into(), at(9));
        let task = tasks.get_mut(1).expect("task");
        assert!(task.complete(at(10)));
        assert!(!task.complete(at(12)));
        assert_eq!(task.completed_at(), Some(at(10)));
    }

    #[test]
    fn content_match_ignores_case() {
        let mut tasks = TaskCollection::new();
        let task = tasks.push("Café Über".into(), at(9)).expect("push");
        assert!(task.has_content("CAFÉ über"));
        assert!(task.has_content("café über"));
        assert!(!task.has_content("cafe uber"));
    }

    #[test]
    fn normalize_repairs_stale_counter() {
        let json = r#"{"tasks":[{"id":4,"content":"a","done":false,"created_at":"2026-10-16 09:00:00"}],"next_id":2}"#;
        let mut tasks: TaskCollection = serde_json::from_str(json).expect("parse");
        assert_eq!(tasks.normalize(), Ok(true));
        assert_eq!(tasks.next_id(), 5);
    }

    #[test]
    fn normalize_rejects_duplicate_ids() {
        let json = r#"{"tasks":[
            {"id":1,"content":"a","done":false,"created_at":"2026-10-16 09:00:00"},
            {"id":1,"content":"b","done":false,"created_at":"2026-10-16 09:00:00"}
        ],"next_id":2}"#;
        let mut tasks: TaskCollection = serde_json::from_str(json).expect("parse");
        assert!(tasks.normalize().is_err());
    }

    #[test]
    fn reads_null_tasks_and_empty_completion() {
        let json = r#"{"tasks":null,"next_id":1}"#;
        let tasks: TaskCollection = serde_json::from_str(json).expect("parse");
        assert!(tasks.is_empty());

        let json = r#"{"id":1,"content":"a","done":false,"created_at":"2026-10-16 09:00:00","completed_at":""}"#;
        let task: Task = serde_json::from_str(json).expect("parse");
        assert_eq!(task.completed_at(), None);
    }
}
