use crate::error::Result;
use crate::task::Task;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Tasks kept in urgency order, backed by a JSON file.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            tasks: Vec::new(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, task: Task) {
        tracing::debug!(name = task.name(), deadline = %task.deadline(), "adding task");
        self.tasks.push(task);
        self.sort();
    }

    /// Earliest deadline first, then most urgent. `sort_by_key` is stable.
    pub fn sort(&mut self) {
        self.tasks.sort_by_key(Task::sort_key);
    }

    /// Marks the task at `index` of the sorted view. Returns false and leaves
    /// the store untouched when nothing is selected or the index is stale.
    pub fn mark_complete(&mut self, index: Option<usize>) -> bool {
        match index.and_then(|i| self.tasks.get_mut(i)) {
            Some(task) if !task.is_completed() => {
                task.mark_complete();
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!(?index, len = self.tasks.len(), "ignoring completion");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, data)?;
        tracing::info!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Replaces the in-memory tasks with the file contents. A missing,
    /// empty or unreadable file leaves the store empty.
    pub fn load(&mut self) {
        self.tasks = match fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Vec::new(),
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                tracing::warn!(path = %self.path.display(), %err, "invalid task file, starting empty");
                Vec::new()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read task file, starting empty");
                Vec::new()
            }
        };
        self.sort();
        tracing::info!(path = %self.path.display(), count = self.tasks.len(), "loaded tasks");
    }
}
