//! Log output setup
//!
//! Logs go to `cdn-resolver.log` in the data directory so that stdout stays
//! reserved for resolution output. The level is taken from `RUST_LOG`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{data_dir, log_path};

const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global subscriber
///
/// The returned guard flushes buffered log lines when dropped and must be
/// kept alive for the lifetime of the process.
pub fn init(json: bool) -> anyhow::Result<WorkerGuard> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let file_name = log_path()
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "cdn-resolver.log".into());
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &dir, file_name,
    ));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!(e))?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
