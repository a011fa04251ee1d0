use std::path::PathBuf;

use tasker_storage::JsonFileStore;
use tracing::debug;

use crate::config::Config;

/// Task file used when neither the command line nor the config names one.
pub const DEFAULT_STORE_FILE: &str = "tasks.json";

/// `--file` wins over the config, which wins over `./tasks.json`.
pub fn resolve_store_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.store_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
}

/// Build the file store for this invocation.
pub fn store_from_config(flag: Option<PathBuf>, config: &Config) -> JsonFileStore {
    let path = resolve_store_path(flag, config);
    debug!(?path, "using task file");
    JsonFileStore::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_config() {
        let config = Config {
            store_path: Some(PathBuf::from("/from/config.json")),
            log_path: None,
        };
        assert_eq!(
            resolve_store_path(Some(PathBuf::from("/from/flag.json")), &config),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            resolve_store_path(None, &config),
            PathBuf::from("/from/config.json")
        );
    }

    #[test]
    fn falls_back_to_working_directory_file() {
        let store = store_from_config(None, &Config::default());
        assert_eq!(store.path(), PathBuf::from(DEFAULT_STORE_FILE).as_path());
    }
}
