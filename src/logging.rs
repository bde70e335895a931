use std::fs::{self, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::io::config_io::state_dir;
use crate::model::LogConfig;

/// Where log lines go
pub enum LogTarget {
    /// CLI subcommands log to stderr
    Stderr,
    /// The TUI owns the terminal, so it logs to a file
    File,
}

/// Build the filter: `RUST_LOG` wins, then `--log-level`, then config.
fn build_filter(flag: Option<&str>, config: &LogConfig) -> EnvFilter {
    let level = flag.unwrap_or(&config.level);
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log file for the TUI. Config wins over the state-dir default.
pub fn log_file_path(config: &LogConfig) -> PathBuf {
    config
        .file
        .clone()
        .unwrap_or_else(|| state_dir().join("taskboard.log"))
}

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must be held for the life of the process.
pub fn init_logging(
    target: LogTarget,
    flag: Option<&str>,
    config: &LogConfig,
) -> std::io::Result<Option<WorkerGuard>> {
    let filter = build_filter(flag, config);
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .try_init();
            Ok(None)
        }
        LogTarget::File => {
            let path = log_file_path(config);
            let file = open_log_file(&path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Ok(Some(guard))
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
