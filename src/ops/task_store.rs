use std::path::{Path, PathBuf};

use crate::io::store_io::{self, StoreError};
use crate::model::task::{Task, TaskId, is_blank};

/// Ordered task list backed by a JSON file.
///
/// Insertion order is display order. Every mutation rewrites the whole file
/// before returning; the in-memory list stays authoritative if that write
/// fails (the unsaved content is in the recovery log).
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

/// Summary counts for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStore {
    /// Load the store from `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = store_io::read_tasks(&path)?;
        let next_id = next_id_after(&path, &tasks)?;
        Ok(TaskStore {
            path,
            tasks,
            next_id,
        })
    }

    /// Replace the in-memory list with the file's current content, picking up
    /// changes another process wrote. Ids already handed out stay retired.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let tasks = store_io::read_tasks(&self.path)?;
        self.next_id = self.next_id.max(next_id_after(&self.path, &tasks)?);
        self.tasks = tasks;
        Ok(())
    }

    /// Rewrite the persisted file from the in-memory list
    pub fn save(&self) -> Result<(), StoreError> {
        store_io::write_tasks(&self.path, &self.tasks)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the data file and its sidecars
    pub fn data_dir(&self) -> PathBuf {
        store_io::data_dir(&self.path)
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

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Display index of a task
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Ids of every task whose text is exactly `text`, in display order
    pub fn find_text(&self, text: &str) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.text == text)
            .map(|t| t.id)
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskCounts {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new task. Blank text is rejected without touching the store.
    pub fn add(&mut self, text: &str) -> Result<TaskId, StoreError> {
        if is_blank(text) {
            return Err(StoreError::EmptyText);
        }
        let id = self.push_new(text)?;
        self.save()?;
        Ok(id)
    }

    fn push_new(&mut self, text: &str) -> Result<TaskId, StoreError> {
        let id = TaskId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::IdOverflow {
                path: self.path.clone(),
            })?;
        self.tasks.push(Task::new(id, text));
        Ok(id)
    }

    /// Remove a task by id. Unknown ids are a no-op returning `None`.
    pub fn remove(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let task = self.tasks.remove(index);
        self.save()?;
        Ok(Some(task))
    }

    /// Remove every task whose text equals `text`. Returns how many were removed.
    pub fn remove_text(&mut self, text: &str) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.text != text);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Replace a task: the old one is removed and a new, not completed task
    /// with `new_text` is appended. Returns the new id.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<TaskId, StoreError> {
        if is_blank(new_text) {
            return Err(StoreError::EmptyText);
        }
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let new_id = self.push_new(new_text)?;
        self.tasks.remove(index);
        self.save()?;
        Ok(new_id)
    }

    /// Text-keyed edit: removes every task with `old_text`, then appends `new_text`.
    pub fn edit_text(&mut self, old_text: &str, new_text: &str) -> Result<TaskId, StoreError> {
        if is_blank(new_text) {
            return Err(StoreError::EmptyText);
        }
        let new_id = self.push_new(new_text)?;
        self.tasks.retain(|t| t.text != old_text || t.id == new_id);
        self.save()?;
        Ok(new_id)
    }

    /// Mark a task completed. Returns whether the flag changed.
    pub fn mark_completed(&mut self, id: TaskId) -> Result<bool, StoreError> {
        self.set_completed(id, true)
    }

    /// Mark the first task with exactly `text` completed. Returns whether the flag changed.
    pub fn mark_completed_text(&mut self, text: &str) -> Result<bool, StoreError> {
        match self.tasks.iter().find(|t| t.text == text) {
            Some(task) => {
                let id = task.id;
                self.set_completed(id, true)
            }
            None => Ok(false),
        }
    }

    /// Set the completed flag. Unknown ids and unchanged flags write nothing.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if task.completed == completed {
            return Ok(false);
        }
        task.completed = completed;
        self.save()?;
        Ok(true)
    }

    /// Flip the completed flag. Returns the new value, or `None` for an unknown id.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Option<bool>, StoreError> {
        let Some(current) = self.get(id).map(|t| t.completed) else {
            return Ok(None);
        };
        self.set_completed(id, !current)?;
        Ok(Some(!current))
    }
}

/// First id after every id in `tasks`
fn next_id_after(path: &Path, tasks: &[Task]) -> Result<u64, StoreError> {
    tasks
        .iter()
        .map(|t| t.id.0)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| StoreError::IdOverflow {
            path: path.to_path_buf(),
        })
}
