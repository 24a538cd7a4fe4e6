use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::DEFAULT_LOG_FILTER;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the rest of the process. When the log directory
/// cannot be used, logging falls back to the console only and no guard is
/// returned.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Daily rotation; the builder creates the directory or reports why it can't
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_name.as_str())
        .build(&config.directory);

    match file_appender {
        Ok(appender) => {
            // Human-readable layer on stderr so stdout stays free for command output
            let console_layer = fmt::layer().with_writer(std::io::stderr);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(appender);

            // JSON layer for the log file
            let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

            // try_init so a second call (e.g. from tests) is harmless
            let _ = tracing_subscriber::registry()
                .with(env_filter(config))
                .with(file_layer)
                .with(console_layer)
                .try_init();

            Some(guard)
        }
        Err(e) => {
            let console_layer = fmt::layer().with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(env_filter(config))
                .with(console_layer)
                .try_init();

            warn!(
                directory = %config.directory.display(),
                "File logging disabled: {}", e
            );
            None
        }
    }
}
