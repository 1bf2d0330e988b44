//! Task repository contract and its backends.
//!
//! The dashboard talks to storage only through [`TaskRepository`]. Two
//! implementations exist: [`LocalRepository`] keeps everything in a JSON file
//! and [`RemoteRepository`] forwards to the hosted record store. [`Backend`]
//! picks one of them from configuration at start-up.

use thiserror::Error;

use crate::fields::{Priority, Status};
use crate::task::{NewTask, Task};

pub mod local;
pub mod remote;

pub use local::LocalRepository;
pub use remote::RemoteRepository;

/// Failures reported by a repository.
///
/// Callers treat every variant the same way: report, log, let the user
/// retry. The split exists for diagnostics only.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("could not reach the task store: {0}")]
    Transport(String),

    #[error("task store rejected the request: {0}")]
    Rejected(String),

    #[error("task {0} does not exist in the store")]
    NotFound(String),

    #[error("task storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("malformed task store payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Exact-match restrictions for [`TaskRepository::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    /// Keep matching tasks, ordered by ascending due date. Ties keep their
    /// storage order.
    pub fn apply(&self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        let mut out: Vec<Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();
        out.sort_by_key(|t| t.due_date);
        out
    }
}

/// Storage operations the dashboard depends on.
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    /// Tasks matching `filter`, ordered by ascending due date.
    async fn list(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>>;

    /// Persist a new task. The store assigns `id` and `created_at`.
    async fn create(&self, task: NewTask) -> RepositoryResult<Task>;

    /// Persist a status change.
    async fn set_status(&self, id: &str, status: Status) -> RepositoryResult<()>;

    /// Remove a task.
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Repository chosen at composition time.
#[derive(Debug)]
pub enum Backend {
    Local(LocalRepository),
    Remote(RemoteRepository),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Local(_) => "local",
            Backend::Remote(_) => "remote",
        }
    }
}

impl TaskRepository for Backend {
    async fn list(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        match self {
            Backend::Local(r) => r.list(filter).await,
            Backend::Remote(r) => r.list(filter).await,
        }
    }

    async fn create(&self, task: NewTask) -> RepositoryResult<Task> {
        match self {
            Backend::Local(r) => r.create(task).await,
            Backend::Remote(r) => r.create(task).await,
        }
    }

    async fn set_status(&self, id: &str, status: Status) -> RepositoryResult<()> {
        match self {
            Backend::Local(r) => r.set_status(id, status).await,
            Backend::Remote(r) => r.set_status(id, status).await,
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        match self {
            Backend::Local(r) => r.delete(id).await,
            Backend::Remote(r) => r.delete(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn task(id: &str, status: Status, priority: Priority, day: u32) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            status,
            priority,
            due_date: NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_matches_exactly_and_sorts_by_due() {
        let tasks = vec![
            task("a", Status::NotStarted, Priority::High, 9),
            task("b", Status::InProgress, Priority::High, 3),
            task("c", Status::NotStarted, Priority::Low, 1),
            task("d", Status::NotStarted, Priority::High, 3),
        ];
        let all = TaskFilter::default().apply(tasks.clone());
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "d", "a"]);

        let filter = TaskFilter {
            status: Some(Status::NotStarted),
            priority: Some(Priority::High),
        };
        let ids: Vec<_> = filter.apply(tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["d", "a"]);
    }
}
