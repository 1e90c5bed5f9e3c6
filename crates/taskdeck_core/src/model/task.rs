//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its creation draft.
//! - Enforce creation-time validation.
//!
//! # Invariants
//! - `id` is assigned by the store on creation and never changes.
//! - `assignees` holds usernames in the order they were linked.
//! - `title` must contain at least one non-whitespace character.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// Persisted task record including its assignee usernames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier, immutable after creation.
    pub id: TaskId,
    /// Short human-readable title.
    pub title: String,
    /// Optional deadline. Absence means "no due date".
    pub due_date: Option<DateTime<Utc>>,
    /// Optional reminder instant, independent of `due_date`.
    pub reminder: Option<DateTime<Utc>>,
    /// Optional originating server/channel group tag.
    pub guild: Option<i64>,
    /// Assigned usernames in assignment order.
    pub assignees: Vec<String>,
}

/// Field set accepted by task creation. Assignees cannot be set here; they
/// go through the assignment path only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub guild: Option<i64>,
}

impl TaskDraft {
    /// Creates a draft holding only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks draft fields against creation contracts.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Validation error for task creation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}
