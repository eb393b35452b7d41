//! Logging for vigilctl
//!
//! Everything goes to a log file so the dashboard's screen stays clean.
//! One-shot commands fall back to stderr when no file can be opened; the
//! dashboard runs without logging in that case.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where logs should go when the file is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Full-screen dashboard: file or nothing
    Dashboard,
    /// One-shot command: file, else stderr
    Command,
}

/// Discover log file path with fallback chain
///
/// Priority:
/// 1. $VIGIL_LOG_FILE (explicit override)
/// 2. $XDG_STATE_HOME/vigil/vigilctl.log
/// 3. ~/.local/state/vigil/vigilctl.log
pub fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("VIGIL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        return Some(Path::new(&state).join("vigil").join("vigilctl.log"));
    }
    dirs::home_dir().map(|home| home.join(".local/state/vigil/vigilctl.log"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `VIGIL_LOG`, then `RUST_LOG`, then `info`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("VIGIL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file in use, if any.
pub fn init(mode: LogMode) -> Option<PathBuf> {
    let file = log_path().and_then(|path| open_log_file(&path).ok().map(|file| (path, file)));

    match (file, mode) {
        (Some((path, file)), _) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            Some(path)
        }
        (None, LogMode::Command) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
        (None, LogMode::Dashboard) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/vigil/vigilctl.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());
    }
}
