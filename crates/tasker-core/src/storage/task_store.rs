use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::{storage::codec, tasks::TaskCollection};

/// Errors produced by task store implementations. Both are fatal to the
/// current invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Storage location could not be read or written.
    #[error("cannot access task store {location}: {reason}")]
    Io { location: String, reason: String },
    /// Storage content exists but is not a valid task collection.
    #[error("task store {location} is corrupt: {reason}")]
    Corrupt { location: String, reason: String },
}

/// Load/save boundary between the in-memory collection and its persisted form.
pub trait TaskStore: Send + Sync {
    /// Read the whole collection. A missing location yields an empty collection.
    fn load(&self) -> Result<TaskCollection, StoreError>;

    /// Replace the stored collection with `tasks`.
    fn save(&self, tasks: &TaskCollection) -> Result<(), StoreError>;
}

/// Store that keeps the encoded collection in memory. Goes through the same
/// JSON codec as the file store, so tests exercise the real format.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskStore {
    inner: Arc<Mutex<Option<Vec<u8>>>>,
}

const LOCATION: &str = "memory";

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw bytes, e.g. to simulate a damaged file.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Raw bytes last written, if any.
    pub fn contents(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let slot = self.inner.lock().map_err(|err| StoreError::Io {
            location: LOCATION.to_string(),
            reason: format!("lock poisoned: {err}"),
        })?;
        Ok(slot.clone())
    }
}

impl TaskStore for InMemoryTaskStore {
    fn load(&self) -> Result<TaskCollection, StoreError> {
        match self.contents()? {
            Some(bytes) => codec::decode(&bytes, LOCATION),
            None => Ok(TaskCollection::new()),
        }
    }

    fn save(&self, tasks: &TaskCollection) -> Result<(), StoreError> {
        let bytes = codec::encode(tasks, LOCATION)?;
        let mut slot = self.inner.lock().map_err(|err| StoreError::Io {
            location: LOCATION.to_string(),
            reason: format!("lock poisoned: {err}"),
        })?;
        *slot = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn missing_contents_load_as_empty() {
        let store = InMemoryTaskStore::new();
        let tasks = store.load().expect("load should succeed");
        assert!(tasks.is_empty());
        assert_eq!(tasks.next_id(), 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = InMemoryTaskStore::new();
        let mut tasks = TaskCollection::new();
        let created = NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .expect("timestamp");
        tasks.push("Write docs".into(), created);

        store.save(&tasks).expect("save should succeed");
        let loaded = store.load().expect("load should succeed");
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let store = InMemoryTaskStore::with_contents("not json");
        let err = store.load().expect_err("load should fail");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
