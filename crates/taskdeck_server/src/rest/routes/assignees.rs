//! Assignment route: link users to a task.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use taskdeck_core::{AssignmentService, SqliteAssigneeRepository, TaskId};

use super::{assignment_error, ApiError};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub assignees: Vec<String>,
}

/// PUT /assignees/{id}: link the listed usernames to the task, creating
/// unknown users on the fly.
pub async fn assign_users(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(body): Json<AssignBody>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.conn();
    let repo = SqliteAssigneeRepository::try_new(&mut conn)
        .map_err(|err| assignment_error(err.into()))?;
    let mut service = AssignmentService::new(repo);

    let linked = service
        .assign_users(id, &body.assignees)
        .map_err(assignment_error)?;
    Ok(Json(
        json!({ "message": format!("added {linked} user(s) to the task") }),
    ))
}
