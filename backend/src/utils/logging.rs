//! Tracing subscriber setup
//!
//! Console output is always on. When `logging.file` is configured a
//! daily-rolling file writer is added next to it; the returned guard must be
//! held for the lifetime of the process or buffered lines are lost.
//!
//! Configuration is loaded before the real subscriber exists, so startup runs
//! under [`bootstrap_subscriber`] until [`init_logging`] takes over.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(true);

    match config.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let directory = directory.unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("logging.file has no file name: {}", file))?;

            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;

            Ok(Some(guard))
        },
        None => {
            tracing_subscriber::registry().with(env_filter).with(console_layer).try_init()?;
            Ok(None)
        },
    }
}

/// Plain-text subscriber used while the configuration is being loaded
///
/// Honors `APP_LOG_LEVEL` when set, `info` otherwise.
pub fn bootstrap_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let level = std::env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(env_filter).with_ansi(false).with_writer(writer).finish()
}
