//! JSON-file task repository.
//!
//! The whole collection is stored under the `tasks` key of one JSON
//! document and rewritten atomically after every mutation. A document that
//! has never been initialised is seeded with three example tasks.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::db::Database;
use crate::fields::{Priority, Status};
use crate::repository::{RepositoryError, RepositoryResult, TaskFilter, TaskRepository};
use crate::task::{NewTask, Task};

#[derive(Debug, Clone)]
pub struct LocalRepository {
    path: PathBuf,
    today: NaiveDate,
}

impl LocalRepository {
    /// Repository backed by the document at `path`. `today` anchors the due
    /// dates of the example tasks.
    pub fn new(path: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            path: path.into(),
            today,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RepositoryResult<Vec<Task>> {
        let db = Database::load(&self.path)?;
        match db.tasks {
            Some(tasks) => Ok(tasks),
            None => {
                let tasks = seed_tasks(self.today);
                info!(path = %self.path.display(), "seeding task store with example tasks");
                self.store(&tasks)?;
                Ok(tasks)
            }
        }
    }

    fn store(&self, tasks: &[Task]) -> RepositoryResult<()> {
        Database {
            tasks: Some(tasks.to_vec()),
        }
        .save(&self.path)?;
        Ok(())
    }
}

impl TaskRepository for LocalRepository {
    async fn list(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        let tasks = self.load()?;
        debug!(count = tasks.len(), ?filter, "listing local tasks");
        Ok(filter.apply(tasks))
    }

    async fn create(&self, task: NewTask) -> RepositoryResult<Task> {
        let mut tasks = self.load()?;
        let id = Database::next_id(&tasks);
        let task = task.into_task(id, Utc::now());
        tasks.push(task.clone());
        self.store(&tasks)?;
        debug!(id = %task.id, "created local task");
        Ok(task)
    }

    async fn set_status(&self, id: &str, status: Status) -> RepositoryResult<()> {
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        task.status = status;
        self.store(&tasks)?;
        debug!(id, %status, "updated local task status");
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        self.store(&tasks)?;
        debug!(id, "deleted local task");
        Ok(())
    }
}

/// Example tasks written to a fresh store.
pub fn seed_tasks(today: NaiveDate) -> Vec<Task> {
    let created_at = Utc::now();
    let mk = |id: &str, title: &str, description: &str, status: Status, priority: Priority, days: i64| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        due_date: today + Duration::days(days),
        created_at,
    };
    vec![
        mk(
            "1",
            "Complete project proposal",
            "Draft the scope, timeline and budget for the client proposal",
            Status::InProgress,
            Priority::High,
            2,
        ),
        mk(
            "2",
            "Review team updates",
            "Go through the weekly status notes from each team",
            Status::NotStarted,
            Priority::Medium,
            1,
        ),
        mk(
            "3",
            "Plan sprint retrospective",
            "",
            Status::Completed,
            Priority::Low,
            -1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn new_task(title: &str, day: u32) -> NewTask {
        NewTask {
            title: title.into(),
            description: String::new(),
            status: Status::NotStarted,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_file_is_seeded_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let repo = LocalRepository::new(&path, today());

        let tasks = repo.list(&TaskFilter::default()).await.unwrap();
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["1", "2", "3"]);
        assert!(path.exists());

        // Ordered by ascending due date.
        let order: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["3", "2", "1"]);
    }

    #[tokio::test]
    async fn empty_list_is_not_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, r#"{"tasks":[]}"#).unwrap();
        let repo = LocalRepository::new(&path, today());
        assert!(repo.list(&TaskFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path().join("tasks.json"), today());
        let created = repo.create(new_task("Buy milk", 20)).await.unwrap();
        assert_eq!(created.id, "4");
        assert_eq!(created.title, "Buy milk");

        let reopened = LocalRepository::new(repo.path(), today());
        let tasks = reopened.list(&TaskFilter::default()).await.unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks.last().map(|t| t.id.as_str()), Some("4"));
    }

    #[tokio::test]
    async fn set_status_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path().join("tasks.json"), today());
        repo.set_status("2", Status::Completed).await.unwrap();

        let done = repo
            .list(&TaskFilter {
                status: Some(Status::Completed),
                priority: None,
            })
            .await
            .unwrap();
        let ids: Vec<_> = done.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["3", "2"]);

        repo.delete("3").await.unwrap();
        let left = repo.list(&TaskFilter::default()).await.unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|t| t.id != "3"));
    }

    #[tokio::test]
    async fn unknown_ids_fail() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path().join("tasks.json"), today());
        assert!(matches!(
            repo.set_status("42", Status::Completed).await,
            Err(RepositoryError::NotFound(id)) if id == "42"
        ));
        assert!(matches!(
            repo.delete("42").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_store_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "[[[").unwrap();
        let repo = LocalRepository::new(&path, today());
        assert!(matches!(
            repo.list(&TaskFilter::default()).await,
            Err(RepositoryError::Storage(_))
        ));
    }
}
