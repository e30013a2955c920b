use std::io;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_JSON_ENV: &str = "DARKPOOLD_LOG_JSON";

/// Run `f` with a stderr-only subscriber. Used while the configuration (and
/// so the log file path) is being resolved.
pub fn with_stderr_logging<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry().with(env_filter()).with(stderr_layer());
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the global subscriber: stderr plus a non-blocking appender on
/// `log_file`. If the file cannot be opened, logging continues on stderr only.
/// The returned guard flushes the file on drop; keep it alive in `main`.
pub fn init_logging(log_file: &Path) -> Option<WorkerGuard> {
    let (file_layer, guard, error) = match file_writer(log_file) {
        Ok((writer, guard)) => (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard), None),
        Err(e) => (None, None, Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer())
        .with(file_layer)
        .try_init();

    if let Some(e) = error {
        tracing::warn!(error = %e, path = %log_file.display(), "log file unavailable");
    }
    guard
}

/// Append-only writer on `path`, never rotated. The parent directory is
/// created if missing.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), InitError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

fn stderr_layer<S>() -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    if use_json() {
        fmt::layer().json().with_writer(io::stderr).boxed()
    } else {
        fmt::layer().with_writer(io::stderr).boxed()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn use_json() -> bool {
    std::env::var(LOG_JSON_ENV).map(|value| value == "1").unwrap_or(false)
}
