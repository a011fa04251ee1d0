use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tasker_core::{
    storage::{codec, StoreError, TaskStore},
    tasks::TaskCollection,
};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// File-backed store holding the whole collection as one pretty-printed JSON
/// document. Saves replace the file atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl TaskStore for JsonFileStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<TaskCollection, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("task file missing, starting with an empty list");
                return Ok(TaskCollection::new());
            }
            Err(err) => return Err(io_err(&self.location(), err)),
        };
        debug!(bytes = bytes.len(), "read task file");
        codec::decode(&bytes, &self.location())
    }

    #[instrument(skip_all, fields(path = %self.path.display(), tasks = tasks.len()))]
    fn save(&self, tasks: &TaskCollection) -> Result<(), StoreError> {
        let bytes = codec::encode(tasks, &self.location())?;
        write_atomic(&self.path, &bytes).map_err(|err| io_err(&self.location(), err))?;
        debug!(bytes = bytes.len(), "wrote task file");
        Ok(())
    }
}

/// Write into a sibling temp file, then rename it over the target so readers
/// see either the old or the new document.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    carry_permissions(path, tmp.as_file())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files are created owner-only; keep the existing file's mode, or use
/// the usual 0644 for a new one.
fn carry_permissions(target: &Path, file: &fs::File) -> io::Result<()> {
    match fs::metadata(target) {
        Ok(meta) => file.set_permissions(meta.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => default_permissions(file),
        Err(err) => Err(err),
    }
}

#[cfg(unix)]
fn default_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

fn io_err(location: &str, err: io::Error) -> StoreError {
    StoreError::Io {
        location: location.to_string(),
        reason: err.to_string(),
    }
}
