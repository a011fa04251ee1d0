use tasker_core::{
    command::{Rejection, ValidationError, MAX_CONTENT_CHARS},
    tasks::TaskCollection,
};

/// Parse a user-supplied id. Surrounding whitespace is ignored; anything that
/// is not an unsigned integer is rejected.
pub fn parse_id(raw: &str) -> Result<u64, Rejection> {
    raw.trim().parse().map_err(|_| Rejection::InvalidId {
        raw: raw.to_string(),
    })
}

/// Trim the text and check it is non-empty and within the length limit.
/// Length is counted in code points.
pub fn content(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_CONTENT_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_CONTENT_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

/// Fail if another task (ignoring `except`) already has this text, ignoring case.
pub fn ensure_unique(
    tasks: &TaskCollection,
    content: &str,
    except: Option<u64>,
) -> Result<(), ValidationError> {
    match tasks
        .tasks()
        .iter()
        .find(|task| Some(task.id()) != except && task.has_content(content))
    {
        Some(existing) => Err(ValidationError::Duplicate {
            existing_id: existing.id(),
        }),
        None => Ok(()),
    }
}
