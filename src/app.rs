use std::time::{Duration, Instant};

use crate::error::Result;
use crate::task::Task;
use crate::task_store::TaskStore;

pub const DONE_GLYPH: &str = "✅";
pub const PENDING_GLYPH: &str = "❌";

/// One line of the task list as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub status: &'static str,
    pub name: String,
    pub deadline: String,
    pub priority: String,
}

impl From<&Task> for DisplayRow {
    fn from(task: &Task) -> Self {
        Self {
            status: if task.is_completed() {
                DONE_GLYPH
            } else {
                PENDING_GLYPH
            },
            name: task.name().to_string(),
            deadline: task.deadline().to_string(),
            priority: task.priority().to_string(),
        }
    }
}

#[derive(Debug)]
struct StatusMessage {
    text: String,
    shown_at: Instant,
}

/// What the presentation layer talks to.
#[derive(Debug)]
pub struct App {
    store: TaskStore,
    status: Option<StatusMessage>,
    status_ttl: Duration,
    dirty: bool,
}

impl App {
    pub fn new(store: TaskStore, status_ttl: Duration) -> Self {
        Self {
            store,
            status: None,
            status_ttl,
            dirty: false,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Form input: surrounding whitespace is dropped, so a blank name is empty.
    pub fn add_task(&mut self, name: &str, deadline: &str, priority: &str) -> Result<()> {
        let task = Task::parse(name.trim(), deadline, priority)?;
        self.store.add(task);
        self.dirty = true;
        Ok(())
    }

    pub fn display_list(&self) -> Vec<DisplayRow> {
        self.store.tasks().iter().map(DisplayRow::from).collect()
    }

    /// Completion is written through right away.
    pub fn mark_selected_complete(&mut self, selection: Option<usize>) {
        if !self.store.mark_complete(selection) {
            return;
        }
        match self.store.save() {
            Ok(()) => {
                self.dirty = false;
                self.set_status("Task marked as done.");
            }
            Err(err) => {
                tracing::error!(%err, "failed to save after completion");
                self.dirty = true;
                self.set_status(format!("Could not save: {err}"));
            }
        }
    }

    pub fn save_all(&mut self) -> Result<()> {
        if let Err(err) = self.store.save() {
            tracing::error!(%err, "failed to save tasks");
            self.set_status(format!("Could not save: {err}"));
            return Err(err);
        }
        self.dirty = false;
        self.set_status("Tasks saved successfully!");
        Ok(())
    }

    /// In-memory only; the file keeps its contents until the next save.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.dirty = true;
        self.set_status("All tasks have been cleared. Save to make it permanent.");
    }

    pub fn load_all(&mut self) {
        self.store.load();
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// The status message, until it expires.
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| s.shown_at.elapsed() < self.status_ttl)
            .map(|s| s.text.as_str())
    }
}
