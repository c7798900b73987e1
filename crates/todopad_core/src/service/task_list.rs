//! Per-user task list service.
//!
//! # Responsibility
//! - Load one user's tasks from their storage key and keep them in order.
//! - Apply add/toggle/edit/remove/clear operations and persist the result.
//!
//! # Invariants
//! - Only entries passing `validate_task_item` are loaded.
//! - Ids are unique within the list; new ids grow monotonically.
//! - A failed operation leaves the list and the store unchanged.

use crate::filter::{compute_stats, filter_tasks, TaskFilter, TaskStats};
use crate::model::storage_key::{generate_storage_key, StorageKey, StorageKeyError};
use crate::model::task::{TaskId, TaskItem, TaskValidationError};
use crate::store::{read_json_array, write_json, JsonArrayRead, KvStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskListResult<T> = Result<T, TaskListError>;

#[derive(Debug)]
pub enum TaskListError {
    /// Task text fails task rules.
    InvalidInput(String),
    /// No task with this id.
    NotFound(TaskId),
    /// Store read or write failed.
    Store(StoreError),
}

impl Display for TaskListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid task input: {details}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TaskListError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TaskValidationError> for TaskListError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<StorageKeyError> for TaskListError {
    fn from(value: StorageKeyError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

/// One user's task collection.
pub struct TaskListService<S: KvStore> {
    store: S,
    key: StorageKey,
    tasks: Vec<TaskItem>,
}

impl<S: KvStore> TaskListService<S> {
    /// Loads the task list of `user_name`.
    ///
    /// Invalid entries are dropped and an unreadable list starts empty; both
    /// cases are logged.
    pub fn open(store: S, user_name: &str) -> TaskListResult<Self> {
        let key = generate_storage_key(user_name)?;
        let tasks = match read_json_array(&store, key.as_str())? {
            JsonArrayRead::Missing => Vec::new(),
            JsonArrayRead::Corrupt(reason) => {
                warn!(
                    "event=tasks_load module=task_list status=recovered error_code=storage_corrupt key={} error={reason}",
                    key.as_str()
                );
                Vec::new()
            }
            JsonArrayRead::Items(items) => {
                let total = items.len();
                let tasks = unique_valid_tasks(&items);
                if tasks.len() != total {
                    warn!(
                        "event=tasks_load module=task_list status=recovered error_code=invalid_entries key={} skipped={}",
                        key.as_str(),
                        total - tasks.len()
                    );
                }
                tasks
            }
        };

        Ok(Self { store, key, tasks })
    }

    pub fn storage_key(&self) -> &StorageKey {
        &self.key
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn filtered(&self, filter: TaskFilter) -> Vec<&TaskItem> {
        filter_tasks(&self.tasks, filter)
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks)
    }

    /// Appends a new open task.
    pub fn add_task(&mut self, text: &str) -> TaskListResult<TaskItem> {
        let mut task = TaskItem::new(text)?;
        task.id = self.next_id(task.id);

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;
        info!(
            "event=task_add module=task_list status=ok key={} id={}",
            self.key.as_str(),
            task.id
        );
        Ok(task)
    }

    /// Flips completion of task `id`; returns the updated task.
    pub fn toggle_task(&mut self, id: TaskId) -> TaskListResult<TaskItem> {
        self.update(id, |task| {
            task.toggle();
            Ok(())
        })
    }

    /// Replaces the text of task `id` with trimmed `text`.
    pub fn edit_task(&mut self, id: TaskId, text: &str) -> TaskListResult<TaskItem> {
        self.update(id, |task| task.set_text(text))
    }

    pub fn remove_task(&mut self, id: TaskId) -> TaskListResult<TaskItem> {
        let index = self.position(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(
            "event=task_remove module=task_list status=ok key={} id={id}",
            self.key.as_str()
        );
        Ok(removed)
    }

    /// Drops every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> TaskListResult<usize> {
        let next: Vec<TaskItem> = filter_tasks(&self.tasks, TaskFilter::Active)
            .into_iter()
            .cloned()
            .collect();
        let removed = self.tasks.len() - next.len();
        if removed > 0 {
            self.commit(next)?;
        }
        Ok(removed)
    }

    fn update(
        &mut self,
        id: TaskId,
        apply: impl FnOnce(&mut TaskItem) -> Result<(), TaskValidationError>,
    ) -> TaskListResult<TaskItem> {
        let index = self.position(id)?;
        let mut next = self.tasks.clone();
        apply(&mut next[index])?;
        let updated = next[index].clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn position(&self, id: TaskId) -> TaskListResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskListError::NotFound(id))
    }

    /// `candidate` unless an existing id is equal or larger.
    fn next_id(&self, candidate: TaskId) -> TaskId {
        match self.tasks.iter().map(|task| task.id).max() {
            Some(max) if max >= candidate => max.saturating_add(1),
            _ => candidate,
        }
    }

    fn commit(&mut self, next: Vec<TaskItem>) -> TaskListResult<()> {
        write_json(&self.store, self.key.as_str(), &next)?;
        self.tasks = next;
        Ok(())
    }
}

/// Keeps valid items, dropping later duplicates of an id.
fn unique_valid_tasks(items: &[serde_json::Value]) -> Vec<TaskItem> {
    let mut tasks: Vec<TaskItem> = Vec::with_capacity(items.len());
    for task in items.iter().filter_map(|item| TaskItem::from_json(item).ok()) {
        if tasks.iter().all(|existing| existing.id != task.id) {
            tasks.push(task);
        }
    }
    tasks
}
