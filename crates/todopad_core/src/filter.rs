//! Task list views and counters.
//!
//! # Invariants
//! - Filtering preserves input order and never mutates the input.
//! - `active + completed == total` for every input.

use crate::model::task::TaskItem;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &TaskItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskFilter(pub String);

impl Display for UnknownTaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown task filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownTaskFilter {}

impl FromStr for TaskFilter {
    type Err = UnknownTaskFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownTaskFilter(other.to_string())),
        }
    }
}

/// Counters shown alongside a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Returns the tasks visible under `filter`, in input order.
pub fn filter_tasks(tasks: &[TaskItem], filter: TaskFilter) -> Vec<&TaskItem> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Counts all, open and completed tasks in one pass.
pub fn compute_stats(tasks: &[TaskItem]) -> TaskStats {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}
