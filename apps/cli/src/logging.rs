use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use suppressor_core::{AppError, AppResult};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEBUG_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest=info,h2=info,rustls=info";

/// Installs console and append-mode file logging for the current thread.
///
/// Events are dispatched until the returned guard is dropped.
pub fn init_logging(debug: bool, log_file: &Path) -> AppResult<DefaultGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to open log file '{}': {error}",
                log_file.display()
            ))
        })?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        );

    Ok(tracing::subscriber::set_default(subscriber))
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { DEBUG_FILTER } else { "info" }))
}
