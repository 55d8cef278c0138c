use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "trak_etl.log";
const DEFAULT_FILTER: &str = "trak_etl=info,warn";

/// Install the global subscriber: human-readable lines on stderr and JSON
/// lines in a daily file under `log_dir`. `RUST_LOG` overrides the filter.
///
/// Buffered file output is flushed when the returned guard drops, so hold it
/// until the process is about to exit.
pub fn init_logging(log_dir: &Path) -> WorkerGuard {
    let _ = fs::create_dir_all(log_dir);

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_log_is_flushed_when_guard_drops() {
        let tmp = tempdir().unwrap();
        let guard = init_logging(tmp.path());

        tracing::error!(dataset = "ds", "ETL failed: fetch error");
        drop(guard);

        let contents: String = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
            .collect();
        assert!(contents.contains("ETL failed: fetch error"));
        assert!(contents.contains("\"level\":\"ERROR\""));
    }
}
