//! Runtime configuration
//!
//! Resolved from environment variables, optionally seeded from a `.env` file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the SQLite database location
pub const DATABASE_PATH_VAR: &str = "LIFELOG_DATABASE_PATH";
/// Environment variable overriding where rendered charts are written
pub const CHART_DIR_VAR: &str = "LIFELOG_CHART_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub chart_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present;
    /// variables already set in the environment win.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let chart_dir = std::env::var(CHART_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_chart_dir(&database_path));

        Self {
            database_path,
            chart_dir,
        }
    }
}

/// `<project>/data/lifelog.db`, walking up out of `target/{debug,release}`
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(project) = path.parent().and_then(Path::parent) {
            path = project.to_path_buf();
        }
    }

    path.push("data");
    path.push("lifelog.db");
    path
}

fn default_chart_dir(database_path: &Path) -> PathBuf {
    database_path
        .parent()
        .map(|dir| dir.join("charts"))
        .unwrap_or_else(|| PathBuf::from("charts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_dir_sits_next_to_database() {
        let dir = default_chart_dir(Path::new("/var/lib/lifelog/lifelog.db"));
        assert_eq!(dir, PathBuf::from("/var/lib/lifelog/charts"));
    }

    #[test]
    fn test_default_database_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/lifelog.db"));
    }
}
