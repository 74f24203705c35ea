use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console and rolling JSON file logging.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// keeps it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let _ = fs::create_dir_all(&config.directory);

    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // stderr keeps stdout clean for --json output
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
