use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use tracing::{Level, Subscriber};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::MakeWriter,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::{config::Config, tasks::OUTCOME_TARGET};

/// Log file used when neither the command line nor the config names one.
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// `--log-file` wins over the config, which wins over `./app.log`.
pub fn resolve_log_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.log_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Install the global subscriber: every event at the env filter level is
/// appended to `log_path`, and other warnings also go to stderr. Keep the
/// returned guard alive until exit so buffered lines are flushed.
pub fn init(log_path: &Path) -> Result<WorkerGuard> {
    let file_name = log_path.file_name().ok_or_else(|| {
        color_eyre::eyre::eyre!("log path {} has no file name", log_path.display())
    })?;
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    // Respect user-provided filters, default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer(std::io::stderr))
        .try_init()?;
    Ok(guard)
}

/// Warnings and errors for the terminal. Command results are skipped: the
/// command already printed them to stdout or stderr.
fn console_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter_fn(|meta| {
            meta.target() != OUTCOME_TARGET && *meta.level() <= Level::WARN
        }))
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tasker_core::{command::Command, storage::InMemoryTaskStore};

    use super::*;
    use crate::tasks::{self, Disposition};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().expect("lock").clone()).expect("utf8")
        }
    }

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejections_reach_the_log_file_but_not_the_console() {
        let console = SharedBuf::default();
        let file = SharedBuf::default();
        let subscriber = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer({
                        let file = file.clone();
                        move || file.clone()
                    })
                    .with_ansi(false),
            )
            .with(console_layer({
                let console = console.clone();
                move || console.clone()
            }));

        let store = InMemoryTaskStore::new();
        let mut err = Vec::new();
        let disposition = tracing::subscriber::with_default(subscriber, || {
            tasks::handle(
                Command::Toggle { id: "abc".into() },
                &store,
                &mut io::sink(),
                &mut err,
            )
        })
        .expect("handle");

        assert_eq!(disposition, Disposition::Rejected);
        assert_eq!(
            String::from_utf8(err).expect("utf8"),
            "error: invalid task id: \"abc\"\n"
        );
        assert!(!console.text().contains("command rejected"), "{}", console.text());
        assert!(file.text().contains("command rejected"), "{}", file.text());
    }

    #[test]
    fn other_warnings_still_reach_the_console() {
        let console = SharedBuf::default();
        let subscriber = tracing_subscriber::registry().with(console_layer({
            let console = console.clone();
            move || console.clone()
        }));

        let store = InMemoryTaskStore::with_contents(
            r#"{"tasks":[{"id":4,"content":"a","done":false,"created_at":"2026-10-16 09:00:00"}],"next_id":2}"#,
        );
        tracing::subscriber::with_default(subscriber, || {
            tasks::handle(Command::List, &store, &mut io::sink(), &mut io::sink())
        })
        .expect("handle");

        let text = console.text();
        assert!(text.contains("repaired"), "{text}");
        assert!(!text.contains("listed 1 tasks"), "{text}");
    }

    #[test]
    fn log_flag_beats_config() {
        let config = Config {
            store_path: None,
            log_path: Some(PathBuf::from("/var/log/tasker.log")),
        };
        assert_eq!(
            resolve_log_path(Some(PathBuf::from("here.log")), &config),
            PathBuf::from("here.log")
        );
        assert_eq!(
            resolve_log_path(None, &config),
            PathBuf::from("/var/log/tasker.log")
        );
        assert_eq!(
            resolve_log_path(None, &Config::default()),
            PathBuf::from(DEFAULT_LOG_FILE)
        );
    }
}
