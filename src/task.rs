use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Priority tier. Lower rank sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Urgent,
    #[default]
    Normal,
    Relaxed,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Urgent, Priority::Normal, Priority::Relaxed];

    pub fn rank(self) -> u8 {
        match self {
            Self::Urgent => 1,
            Self::Normal => 2,
            Self::Relaxed => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::Normal => "Normal",
            Self::Relaxed => "Relaxed",
        }
    }

    /// Next tier in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Urgent => Self::Normal,
            Self::Normal => Self::Relaxed,
            Self::Relaxed => Self::Urgent,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Urgent => Self::Relaxed,
            Self::Normal => Self::Urgent,
            Self::Relaxed => Self::Normal,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // Older files store the tier as "Urgent:1"; the rank must agree with the name.
        let (name, rank) = match trimmed.split_once(':') {
            Some((name, rank)) => (name, Some(rank.trim())),
            None => (trimmed, None),
        };
        let priority = Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| PlannerError::InvalidPriority {
                label: s.to_string(),
            })?;
        match rank {
            Some(rank) if rank != priority.rank().to_string() => {
                Err(PlannerError::InvalidPriority {
                    label: s.to_string(),
                })
            }
            _ => Ok(priority),
        }
    }
}

pub fn parse_deadline(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PlannerError::EmptyDeadline);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| PlannerError::InvalidDate {
        input: input.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredTask", into = "StoredTask")]
pub struct Task {
    name: String,
    deadline: NaiveDate,
    priority: Priority,
    completed: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, deadline: NaiveDate, priority: Priority) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(PlannerError::EmptyName);
        }
        Ok(Self {
            name,
            deadline,
            priority,
            completed: false,
        })
    }

    /// Builds a task from text fields. The name is kept as given.
    pub fn parse(name: &str, deadline: &str, priority: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(PlannerError::EmptyName);
        }
        let deadline = parse_deadline(deadline)?;
        let priority = priority.parse()?;
        Self::new(name, deadline, priority)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// One-way: there is no way back to pending.
    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    pub fn sort_key(&self) -> (NaiveDate, u8) {
        (self.deadline, self.priority.rank())
    }
}

/// On-disk shape of a task.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTask {
    name: String,
    deadline: String,
    priority: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<StoredTask> for Task {
    type Error = PlannerError;

    fn try_from(stored: StoredTask) -> Result<Self> {
        let mut task = Task::parse(&stored.name, &stored.deadline, &stored.priority)?;
        task.completed = stored.completed;
        Ok(task)
    }
}

impl From<Task> for StoredTask {
    fn from(task: Task) -> Self {
        Self {
            name: task.name,
            deadline: task.deadline.format(DATE_FORMAT).to_string(),
            priority: task.priority.label().to_string(),
            completed: task.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks_are_fixed() {
        assert_eq!(Priority::Urgent.rank(), 1);
        assert_eq!(Priority::Normal.rank(), 2);
        assert_eq!(Priority::Relaxed.rank(), 3);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn priority_parses_labels_and_legacy_form() {
        assert_eq!("Urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("relaxed".parse::<Priority>().unwrap(), Priority::Relaxed);
        assert_eq!("Normal:2".parse::<Priority>().unwrap(), Priority::Normal);
        assert!("Normal:1".parse::<Priority>().is_err());
        assert!("Someday".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_cycles() {
        assert_eq!(Priority::Relaxed.next(), Priority::Urgent);
        assert_eq!(Priority::Urgent.prev(), Priority::Relaxed);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            Task::parse("", "2025-06-01", "Normal"),
            Err(PlannerError::EmptyName)
        ));
        assert!(matches!(
            Task::parse("Write report", "", "Normal"),
            Err(PlannerError::EmptyDeadline)
        ));
        assert!(matches!(
            Task::parse("Write report", "2025-02-30", "Normal"),
            Err(PlannerError::InvalidDate { .. })
        ));
        assert!(matches!(
            Task::parse("Write report", "06/01/2025", "Normal"),
            Err(PlannerError::InvalidDate { .. })
        ));
        assert!(matches!(
            Task::parse("Write report", "2025-06-01", "High"),
            Err(PlannerError::InvalidPriority { .. })
        ));
    }

    #[test]
    fn new_task_starts_pending() {
        let mut task = Task::parse(" Write report ", "2025-06-01", "Normal").unwrap();
        assert_eq!(task.name(), " Write report ");
        assert!(!task.is_completed());
        task.mark_complete();
        assert!(task.is_completed());
    }

    #[test]
    fn serializes_with_iso_deadline_and_bare_label() {
        let task = Task::parse("Submit form", "2025-05-30", "Urgent:1").unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Submit form",
                "deadline": "2025-05-30",
                "priority": "Urgent",
                "completed": false
            })
        );
    }

    #[test]
    fn deserialize_rejects_unknown_priority() {
        let raw = r#"{"name":"x","deadline":"2025-05-30","priority":"Later","completed":false}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }
}
