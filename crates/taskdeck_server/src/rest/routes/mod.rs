//! Per-resource route handlers and shared error mapping.

pub mod assignees;
pub mod due_date;
pub mod health;
pub mod reminder;
pub mod tasks;

use axum::http::StatusCode;
use axum::Json;
use log::error;
use serde_json::{json, Value};
use taskdeck_core::{AssignmentError, RepoError, TaskServiceError};

/// Error tuple every handler returns on failure.
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn task_error(err: TaskServiceError) -> ApiError {
    match err {
        TaskServiceError::TaskNotFound(id) => not_found(id),
        TaskServiceError::InvalidTimestamp(value) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("invalid timestamp: `{value}`") })),
        ),
        TaskServiceError::Repo(RepoError::Validation(source)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": source.to_string() })),
        ),
        other => internal_error(&other),
    }
}

pub(crate) fn assignment_error(err: AssignmentError) -> ApiError {
    match err {
        AssignmentError::TaskNotFound(id) => not_found(id),
        AssignmentError::DuplicateAssignment(usernames) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!(
                    "user(s) {} are already assigned to this task",
                    usernames.join(", ")
                ),
                "duplicates": usernames,
            })),
        ),
        other => internal_error(&other),
    }
}

fn not_found(id: taskdeck_core::TaskId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("task {id} not found") })),
    )
}

fn internal_error(err: &dyn std::fmt::Display) -> ApiError {
    error!("event=request_failed module=server status=error error={err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal storage failure" })),
    )
}
