//! Diagnostic logging. Never writes to stdout: stdout carries protocol traffic.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::types::{McpError, McpResult};

/// Install the global subscriber: stderr always, plus `log_file` if given.
///
/// `RUST_LOG` overrides `level`.
pub fn init(level: &str, log_file: Option<&Path>) -> McpResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(file_appender(path)?)
                .with_ansi(false)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| McpError::Initialization(format!("Logging already initialized: {e}")))?;

    if let Some(path) = log_file {
        tracing::debug!("Logging to {}", path.display());
    }
    Ok(())
}

/// Append-only writer for `path`, creating its directory if needed.
pub fn file_appender(path: &Path) -> McpResult<RollingFileAppender> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        McpError::Initialization(format!("Log path has no file name: {}", path.display()))
    })?;

    std::fs::create_dir_all(dir).map_err(|e| {
        McpError::Initialization(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| {
            McpError::Initialization(format!("Failed to open log file {}: {e}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("zundamon.log");

        let mut appender = file_appender(&path).unwrap();
        writeln!(appender, "hello").unwrap();
        appender.flush().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "hello\n");
    }

    #[test]
    fn test_file_appender_rejects_directory_path() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}
