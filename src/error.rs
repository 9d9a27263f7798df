use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Please enter your task.")]
    EmptyName,

    #[error("Please enter a deadline.")]
    EmptyDeadline,

    #[error("Invalid date '{input}'. Please use YYYY-MM-DD format.")]
    InvalidDate { input: String },

    #[error("Unknown priority '{label}'. Expected Urgent, Normal or Relaxed.")]
    InvalidPriority { label: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode tasks: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bad_input() {
        let err = PlannerError::InvalidPriority {
            label: "Someday".into(),
        };
        assert!(err.to_string().contains("Someday"));
    }

    #[test]
    fn config_error_shows_path() {
        let err = PlannerError::Config {
            path: PathBuf::from("/etc/planner.toml"),
            reason: "expected an integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config file '/etc/planner.toml': expected an integer"
        );
    }
}
