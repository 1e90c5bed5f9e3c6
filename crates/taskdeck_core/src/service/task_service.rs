//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/list/delete and due-date/reminder entry points.
//! - Render and parse the timestamp formats the chat-bot contract uses.
//!
//! # Invariants
//! - Task list order is due date ascending, undated tasks last, ties by id.
//! - Due dates render with minute precision and no timezone offset.
//! - Reminder input must parse as a timezone-aware RFC 3339 instant.

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DUE_DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Timestamp input could not be parsed as a timezone-aware instant.
    InvalidTimestamp(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidTimestamp(value) => write!(f, "invalid timestamp: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task and returns the stored record.
    pub fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskServiceError> {
        let id = self.repo.create_task(draft)?;
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    /// Lists tasks ordered by due date with optional assignee/guild
    /// filters. Pure read.
    pub fn list_tasks(&self, query: &TaskListQuery) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_tasks(query)?)
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Deletes one task by id.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        Ok(self.repo.delete_task(id)?)
    }

    /// Overwrites the task's due date. Last write wins, no history.
    pub fn set_due_date(
        &self,
        id: TaskId,
        due_date: DateTime<Utc>,
    ) -> Result<(), TaskServiceError> {
        Ok(self.repo.set_due_date(id, due_date)?)
    }

    /// Returns the task's due date rendered for chat display, or `None`
    /// when no due date is set.
    pub fn due_date(&self, id: TaskId) -> Result<Option<String>, TaskServiceError> {
        let task = self.get_task(id)?;
        Ok(task.due_date.map(format_due_date))
    }

    /// Parses and stores a reminder instant, overwriting any previous one.
    pub fn set_reminder(&self, id: TaskId, raw: &str) -> Result<(), TaskServiceError> {
        let reminder = parse_reminder(raw)?;
        Ok(self.repo.set_reminder(id, reminder)?)
    }
}

/// Renders a due date with minute precision and no timezone offset.
pub fn format_due_date(value: DateTime<Utc>) -> String {
    value.format(DUE_DATE_DISPLAY_FORMAT).to_string()
}

/// Parses reminder input as a timezone-aware RFC 3339 instant.
pub fn parse_reminder(raw: &str) -> Result<DateTime<Utc>, TaskServiceError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| TaskServiceError::InvalidTimestamp(raw.to_string()))
}
