//! Tracing setup for the CLI.

use anyhow::{Context, Result};
use seedline_infrastructure::SeedlinePaths;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "seedline=info,polling=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// Logs always go to stderr; with `to_file` they are also appended to a daily
/// file under the logs directory. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init(config_dir: Option<&Path>, to_file: bool) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if !to_file {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let logs_dir = SeedlinePaths::new(config_dir)
        .logs_dir()
        .context("Cannot resolve logs directory")?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "seedline.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}
