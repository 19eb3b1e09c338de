use std::env;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Console layer on stderr plus a plain-text file layer at `log_file`.
///
/// `TRACING_LEVEL` sets the filter (default `info`). Keep the returned guard alive
/// until exit or buffered file lines are lost.
pub fn init_logger(log_file: &Path) -> WorkerGuard {
    let filter_layer = env::var("TRACING_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let _ = fs::create_dir_all(log_dir);
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "face-compare.log".into());

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    guard
}
