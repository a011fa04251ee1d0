use tracing::warn;

use crate::{storage::StoreError, tasks::TaskCollection};

/// Serialize the collection as pretty-printed JSON with a trailing newline.
pub fn encode(tasks: &TaskCollection, location: &str) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(tasks).map_err(|err| StoreError::Io {
        location: location.to_string(),
        reason: format!("encode failed: {err}"),
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse stored bytes and restore the collection invariants.
pub fn decode(bytes: &[u8], location: &str) -> Result<TaskCollection, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        location: location.to_string(),
        reason,
    };

    let mut tasks: TaskCollection =
        serde_json::from_slice(bytes).map_err(|err| corrupt(err.to_string()))?;
    if tasks.normalize().map_err(corrupt)? {
        warn!(
            location,
            next_id = tasks.next_id(),
            "stored next_id was behind existing ids; repaired"
        );
    }
    Ok(tasks)
}
