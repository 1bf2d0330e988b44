//! Dashboard state driver.
//!
//! A [`Dashboard`] owns the task collection shown to the user and the
//! statistics derived from it. Every user action is a [`Request`]; handling
//! one awaits a single repository call and then applies its effect in one
//! step: update the collection, recompute [`Stats`], record a [`Notice`].
//! Nothing is retried. A failed action leaves the dashboard as it was so
//! the user can simply try again.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::collection::{CollectionError, TaskCollection};
use crate::fields::Status;
use crate::repository::{RepositoryError, TaskFilter, TaskRepository};
use crate::stats::{compute_stats, Stats};
use crate::task::{Task, TaskDraft};
use crate::validate::ValidationErrors;

/// Undrained notices kept before the oldest are discarded.
pub const MAX_NOTICES: usize = 32;

/// A user-initiated action.
#[derive(Debug, Clone)]
pub enum Request {
    Reload(TaskFilter),
    Create(TaskDraft),
    SetStatus { id: String, status: Status },
    Delete { id: String },
}

/// What a successful request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Reloaded { count: usize },
    Created(Task),
    StatusChanged { id: String, status: Status },
    Deleted { id: String },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid task: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("task list is out of sync with the store: {0}")]
    Desync(#[from] CollectionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message produced by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Creation form contents. Kept with its errors after a failed submission,
/// reset after a successful one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub draft: TaskDraft,
    pub errors: ValidationErrors,
}

#[derive(Debug)]
pub struct Dashboard<R> {
    repo: R,
    tasks: TaskCollection,
    stats: Stats,
    today: NaiveDate,
    strict: bool,
    form: Form,
    notices: Vec<Notice>,
}

impl<R: TaskRepository> Dashboard<R> {
    pub fn new(repo: R, today: NaiveDate) -> Self {
        Self {
            repo,
            tasks: TaskCollection::new(),
            stats: Stats::default(),
            today,
            strict: false,
            form: Form {
                draft: TaskDraft::default_for(today),
                errors: ValidationErrors::default(),
            },
            notices: Vec::new(),
        }
    }

    /// Report collection/store disagreements as errors instead of
    /// ignoring them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Notices recorded since the last [`take_notices`](Self::take_notices),
    /// oldest first. Callers are expected to drain them after each request;
    /// only the latest [`MAX_NOTICES`] are retained otherwise.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Move the clock used for upcoming counts and recompute.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.refresh_stats();
    }

    pub async fn handle(&mut self, request: Request) -> Result<Response, DashboardError> {
        debug!(?request, "handling dashboard request");
        match request {
            Request::Reload(filter) => self.reload(filter).await,
            Request::Create(draft) => self.create(draft).await,
            Request::SetStatus { id, status } => self.set_status(id, status).await,
            Request::Delete { id } => self.delete(id).await,
        }
    }

    async fn reload(&mut self, filter: TaskFilter) -> Result<Response, DashboardError> {
        let listed = match self.repo.list(&filter).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(error = %e, "error loading tasks");
                self.notify(NoticeLevel::Error, "Could not load tasks");
                return Err(e.into());
            }
        };

        let mut tasks = TaskCollection::new();
        for task in listed {
            if let Err(e) = tasks.insert(task) {
                self.desync(e)?;
            }
        }
        let count = tasks.len();
        self.tasks = tasks;
        self.refresh_stats();
        Ok(Response::Reloaded { count })
    }

    async fn create(&mut self, draft: TaskDraft) -> Result<Response, DashboardError> {
        let new_task = match draft.resolve(self.today) {
            Ok(task) => task,
            Err(errors) => {
                self.form = Form {
                    draft,
                    errors: errors.clone(),
                };
                self.notify(NoticeLevel::Error, "Please fix the form errors");
                return Err(DashboardError::Validation(errors));
            }
        };

        let task = match self.repo.create(new_task).await {
            Ok(task) => task,
            Err(e) => {
                error!(error = %e, "error creating task");
                self.form = Form {
                    draft,
                    errors: ValidationErrors::default(),
                };
                self.notify(NoticeLevel::Error, "Failed to create task. Please try again.");
                return Err(e.into());
            }
        };

        if let Err(e) = self.tasks.insert(task.clone()) {
            self.desync(e)?;
        }
        self.refresh_stats();
        self.form = Form {
            draft: TaskDraft::default_for(self.today),
            errors: ValidationErrors::default(),
        };
        self.notify(NoticeLevel::Success, "Task added successfully!");
        Ok(Response::Created(task))
    }

    async fn set_status(&mut self, id: String, status: Status) -> Result<Response, DashboardError> {
        if let Err(e) = self.repo.set_status(&id, status).await {
            error!(id = %id, error = %e, "error updating task status");
            self.notify(NoticeLevel::Error, "Could not update task status");
            return Err(e.into());
        }

        if let Err(e) = self.tasks.update_status(&id, status) {
            self.desync(e)?;
        }
        self.refresh_stats();
        self.notify(NoticeLevel::Info, format!("Task marked as {status}"));
        Ok(Response::StatusChanged { id, status })
    }

    async fn delete(&mut self, id: String) -> Result<Response, DashboardError> {
        if let Err(e) = self.repo.delete(&id).await {
            error!(id = %id, error = %e, "error deleting task");
            self.notify(NoticeLevel::Error, "Could not delete task");
            return Err(e.into());
        }

        if let Err(e) = self.tasks.remove(&id) {
            self.desync(e)?;
        }
        self.refresh_stats();
        self.notify(NoticeLevel::Info, "Task deleted");
        Ok(Response::Deleted { id })
    }

    /// Strict dashboards surface the disagreement; lenient ones log it and
    /// carry on as if the step were a no-op.
    fn desync(&self, e: CollectionError) -> Result<(), DashboardError> {
        if self.strict {
            error!(error = %e, "task collection out of sync");
            return Err(e.into());
        }
        warn!(error = %e, "task collection out of sync; ignoring");
        Ok(())
    }

    fn refresh_stats(&mut self) {
        self.stats = compute_stats(self.tasks.list(), self.today);
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(Notice::new(level, message));
    }
}
