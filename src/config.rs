//! Runtime settings.
//!
//! Resolution order, later wins: built-in defaults, the TOML config file,
//! the `PLANNER_TASKS_FILE` environment variable, then command-line flags.
//!
//! ```toml
//! tasks_file = "/home/me/planner/tasks.json"
//! status_ttl_secs = 3
//! ```

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::{PlannerError, Result};

const APP_DIR: &str = "daily-planner";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tasks_file: PathBuf,
    pub status_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: data_dir().join("tasks.json"),
            status_ttl: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    tasks_file: Option<PathBuf>,
    status_ttl_secs: Option<u64>,
}

impl Config {
    /// Reads `path` on top of the defaults. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(config);
            }
            Err(err) => return Err(err.into()),
        };
        let file: ConfigFile = toml::from_str(&raw).map_err(|err| PlannerError::Config {
            path: path.to_path_buf(),
            reason: err.message().to_string(),
        })?;
        if let Some(tasks_file) = file.tasks_file {
            config.tasks_file = tasks_file;
        }
        if let Some(secs) = file.status_ttl_secs {
            config.status_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_tasks_file(mut self, tasks_file: Option<PathBuf>) -> Self {
        if let Some(tasks_file) = tasks_file {
            self.tasks_file = tasks_file;
        }
        self
    }
}

/// Platform data directory for the planner, or the working directory when
/// the platform has none.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(config, Config::default());
        assert!(config.tasks_file.ends_with("tasks.json"));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "tasks_file = \"/tmp/elsewhere.json\"\nstatus_ttl_secs = 10\n",
        )
        .unwrap();
        let config = Config::load(&path).expect("load");
        assert_eq!(config.tasks_file, PathBuf::from("/tmp/elsewhere.json"));
        assert_eq!(config.status_ttl, Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "status_ttl_secs = \"soon\"\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, PlannerError::Config { .. }));
    }

    #[test]
    fn flag_wins_over_file() {
        let config = Config::default().with_tasks_file(Some(PathBuf::from("cli.json")));
        assert_eq!(config.tasks_file, PathBuf::from("cli.json"));
        let config = config.with_tasks_file(None);
        assert_eq!(config.tasks_file, PathBuf::from("cli.json"));
    }
}
