// Configuration - where the roster lives and where logs go
//
// Resolution order for the database path:
//   1. explicit path (`--db` flag or `ROSTER_DB`, resolved by clap)
//   2. platform data directory (`<data_dir>/roster.db`)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "roster-attendance";
const DB_FILE_NAME: &str = "roster.db";

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Build the configuration, creating the database's parent directory
    /// if needed.
    pub fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = db_override.unwrap_or_else(|| data_dir().join(DB_FILE_NAME));

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        Ok(Config {
            db_path,
            log_dir: log_dir(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Platform data directory
///
/// - Linux: `~/.local/share/roster-attendance`
/// - macOS: `~/Library/Application Support/roster-attendance`
/// - Windows: `%APPDATA%\roster-attendance`
/// - Fallback: `./roster_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./roster_data"))
}

/// Platform cache directory for log files
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_db_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("team.db");

        let config = Config::resolve(Some(db.clone())).unwrap();

        assert_eq!(config.db_path(), db.as_path());
        assert!(dir.path().join("nested").is_dir(), "Parent directory is created");
    }

    #[test]
    fn test_bare_file_name_needs_no_parent() {
        let config = Config::resolve(Some(PathBuf::from("roster.db"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("roster.db"));
    }

    #[test]
    fn test_default_paths_are_namespaced() {
        assert!(data_dir().to_string_lossy().contains(APP_NAME) || data_dir().ends_with("roster_data"));
        assert!(log_dir().ends_with("logs"));
    }
}
