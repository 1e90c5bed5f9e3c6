//! Assignment use-case service.
//!
//! # Responsibility
//! - Normalize assignment requests and delegate to the link repository.
//! - Map persistence errors onto the assignment outcome taxonomy.
//!
//! # Invariants
//! - A username repeated within one request counts as a single assignment.
//! - Either every requested username gets linked or none does.

use crate::model::task::TaskId;
use crate::repo::assignee_repo::AssigneeRepository;
use crate::repo::task_repo::RepoError;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome taxonomy for assignment requests.
#[derive(Debug)]
pub enum AssignmentError {
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Requested usernames already linked to the task, in request order.
    DuplicateAssignment(Vec<String>),
    /// Catch-all for any other failure during reconciliation.
    Failed(RepoError),
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateAssignment(usernames) => write!(
                f,
                "user(s) already assigned to this task: {}",
                usernames.join(", ")
            ),
            Self::Failed(err) => write!(f, "failed to assign user(s): {err}"),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssignmentError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::AlreadyAssigned(usernames) => Self::DuplicateAssignment(usernames),
            other => Self::Failed(other),
        }
    }
}

/// Assignment service facade over the link repository.
pub struct AssignmentService<R: AssigneeRepository> {
    repo: R,
}

impl<R: AssigneeRepository> AssignmentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Links the requested usernames to the task, creating unknown users.
    ///
    /// # Contract
    /// - Repeats within the request collapse to one assignment, keeping
    ///   first-occurrence order.
    /// - Usernames already linked before the request fail the whole call
    ///   with `DuplicateAssignment`; no link is applied.
    /// - Returns the number of usernames linked.
    pub fn assign_users(
        &mut self,
        task_id: TaskId,
        usernames: &[String],
    ) -> Result<usize, AssignmentError> {
        let requested = dedup_preserving_order(usernames);
        Ok(self.repo.assign_users(task_id, &requested)?)
    }
}

/// Collapses repeated usernames to their first occurrence.
fn dedup_preserving_order(usernames: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    usernames
        .iter()
        .filter(|username| seen.insert(username.as_str()))
        .cloned()
        .collect()
}
