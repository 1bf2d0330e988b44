//! In-memory task collection.
//!
//! `TaskCollection` is the single owner of the tasks a dashboard shows. It
//! keeps insertion order, keeps ids unique and mutates tasks in place so a
//! status change never moves a task.

use thiserror::Error;

use crate::fields::Status;
use crate::task::Task;

/// Invariant violations between the collection and its callers.
///
/// These point at a desynchronisation between the collection and the
/// repository it mirrors, not at bad user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("task {0} is already in the collection")]
    DuplicateId(String),

    #[error("task {0} is not in the collection")]
    NotFound(String),
}

/// Ordered, id-keyed sequence of tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a listing, rejecting duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, CollectionError> {
        let mut collection = TaskCollection::new();
        for task in tasks {
            collection.insert(task)?;
        }
        Ok(collection)
    }

    /// Append a task at the end.
    pub fn insert(&mut self, task: Task) -> Result<(), CollectionError> {
        if self.position(&task.id).is_some() {
            return Err(CollectionError::DuplicateId(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Replace the status of one task, leaving every other field and its
    /// position untouched.
    pub fn update_status(&mut self, id: &str, status: Status) -> Result<(), CollectionError> {
        let task = self
            .get_mut(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        task.status = status;
        Ok(())
    }

    /// Remove one task, keeping the relative order of the rest. Returns the
    /// removed task.
    pub fn remove(&mut self, id: &str) -> Result<Task, CollectionError> {
        let idx = self
            .position(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    /// Read-only view in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        let idx = self.position(id)?;
        self.tasks.get_mut(idx)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(id: &str) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            description: String::new(),
            status: Status::NotStarted,
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    fn ids(c: &TaskCollection) -> Vec<&str> {
        c.list().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn insert_appends_once_at_end() {
        let mut c = TaskCollection::from_tasks(vec![task("1"), task("2")]).unwrap();
        let t = task("3");
        c.insert(t.clone()).unwrap();
        assert_eq!(ids(&c), ["1", "2", "3"]);
        assert_eq!(c.list().last(), Some(&t));
        assert_eq!(c.list().iter().filter(|x| x.id == "3").count(), 1);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut c = TaskCollection::from_tasks(vec![task("1")]).unwrap();
        assert_eq!(
            c.insert(task("1")),
            Err(CollectionError::DuplicateId("1".into()))
        );
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn from_tasks_rejects_duplicates() {
        assert!(TaskCollection::from_tasks(vec![task("1"), task("1")]).is_err());
    }

    #[test]
    fn update_status_changes_only_status() {
        let mut c = TaskCollection::from_tasks(vec![task("1"), task("2"), task("3")]).unwrap();
        let before = c.get("2").cloned().unwrap();
        c.update_status("2", Status::Completed).unwrap();
        let after = c.get("2").unwrap();
        assert_eq!(after.status, Status::Completed);
        assert_eq!(
            Task { status: before.status, ..after.clone() },
            before
        );
        assert_eq!(ids(&c), ["1", "2", "3"]);
    }

    #[test]
    fn update_status_unknown_id() {
        let mut c = TaskCollection::new();
        assert_eq!(
            c.update_status("9", Status::InProgress),
            Err(CollectionError::NotFound("9".into()))
        );
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut c =
            TaskCollection::from_tasks(vec![task("1"), task("2"), task("3"), task("4")]).unwrap();
        let removed = c.remove("2").unwrap();
        assert_eq!(removed.id, "2");
        assert_eq!(ids(&c), ["1", "3", "4"]);
        assert!(c.get("2").is_none());
    }

    #[test]
    fn remove_unknown_id() {
        let mut c = TaskCollection::from_tasks(vec![task("1")]).unwrap();
        assert_eq!(c.remove("2"), Err(CollectionError::NotFound("2".into())));
        assert_eq!(c.len(), 1);
    }
}
