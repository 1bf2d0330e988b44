//! Task data structures.
//!
//! This module defines the persisted `Task` record, the raw `TaskDraft` a user
//! fills in, and the `NewTask` a draft turns into once it has been validated.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::parse_due_input;
use crate::fields::*;
use crate::validate::{validate, Field, ValidationErrors};

/// Days between "today" and the due date a fresh draft is pre-filled with.
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// A single unit of work.
///
/// `id` and `created_at` are assigned by the repository that persisted the
/// task and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task still counts as upcoming on `today`.
    ///
    /// The comparison is strict: a task due today is not upcoming.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.due_date > today && self.status != Status::Completed
    }
}

/// Unvalidated task input as typed into the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: String,
}

impl TaskDraft {
    /// A blank draft pre-filled the way the creation form opens: medium
    /// priority, not started, due a week from `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        TaskDraft {
            due_date: (today + Duration::days(DEFAULT_DUE_DAYS))
                .format("%Y-%m-%d")
                .to_string(),
            ..TaskDraft::default()
        }
    }

    /// Validate the draft and convert it into a `NewTask`.
    ///
    /// Field-level errors from [`validate`] are returned untouched. A due
    /// date that is present but cannot be understood is reported on the
    /// same field.
    pub fn resolve(&self, today: NaiveDate) -> Result<NewTask, ValidationErrors> {
        let errors = validate(self);
        if !errors.is_empty() {
            return Err(errors);
        }
        let Some(due_date) = parse_due_input(&self.due_date, today) else {
            let mut errors = ValidationErrors::default();
            errors.insert(Field::DueDate, "Due date is not a valid date");
            return Err(errors);
        };
        Ok(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status,
            priority: self.priority,
            due_date,
        })
    }
}

/// A validated task waiting for the repository to assign an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: NaiveDate,
}

impl NewTask {
    /// Attach the repository-assigned identity.
    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_draft_is_due_in_a_week() {
        let draft = TaskDraft::default_for(day(2025, 3, 28));
        assert_eq!(draft.due_date, "2025-04-04");
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.status, Status::NotStarted);
        assert!(draft.title.is_empty());
    }

    #[test]
    fn resolve_trims_and_parses() {
        let draft = TaskDraft {
            title: "  Buy milk ".into(),
            due_date: "tomorrow".into(),
            priority: Priority::High,
            ..TaskDraft::default()
        };
        let task = draft.resolve(day(2025, 1, 1)).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.due_date, day(2025, 1, 2));
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn resolve_reports_unparseable_due_date() {
        let draft = TaskDraft {
            title: "Ship it".into(),
            due_date: "someday".into(),
            ..TaskDraft::default()
        };
        let errors = draft.resolve(day(2025, 1, 1)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::DueDate), Some("Due date is not a valid date"));
    }

    #[test]
    fn resolve_rejects_out_of_range_due_date() {
        for due in ["in 100000000d", "in 100000000w", "in 100000000m"] {
            let draft = TaskDraft {
                title: "x".into(),
                due_date: due.into(),
                ..TaskDraft::default()
            };
            let errors = draft.resolve(day(2025, 1, 1)).unwrap_err();
            assert_eq!(errors.get(Field::DueDate), Some("Due date is not a valid date"));
        }
    }

    #[test]
    fn resolve_passes_validation_errors_through() {
        let draft = TaskDraft::default();
        let errors = draft.resolve(day(2025, 1, 1)).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::DueDate), Some("Due date is required"));
    }

    #[test]
    fn task_json_uses_camel_case_and_defaults() {
        let json = r#"{"id":"7","title":"Write report","dueDate":"2025-05-01","createdAt":"2025-04-01T09:30:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::NotStarted);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.description, "");
        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["dueDate"], "2025-05-01");
        assert_eq!(out["status"], "Not Started");
    }

    #[test]
    fn upcoming_is_strictly_after_today() {
        let task = NewTask {
            title: "x".into(),
            description: String::new(),
            status: Status::NotStarted,
            priority: Priority::Low,
            due_date: day(2025, 6, 1),
        }
        .into_task("1".into(), Utc::now());
        assert!(!task.is_upcoming(day(2025, 6, 1)));
        assert!(task.is_upcoming(day(2025, 5, 31)));
    }
}
