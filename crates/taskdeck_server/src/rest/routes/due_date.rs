//! Due-date routes: read the rendered value, overwrite the stored one.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use taskdeck_core::{SqliteTaskRepository, TaskId, TaskService};

use super::{task_error, ApiError};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct DueDateBody {
    pub due_date: DateTime<Utc>,
}

/// POST /due-date/{id}: overwrite the task's due date.
pub async fn set_due_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(body): Json<DueDateBody>,
) -> Result<Json<Value>, ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.set_due_date(id, body.due_date).map_err(task_error)?;
    Ok(Json(json!({ "message": "due date assigned to the task" })))
}

/// GET /due-date/{id}: rendered due date, or null when unset.
pub async fn get_due_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Option<String>>, ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let rendered = service.due_date(id).map_err(task_error)?;
    Ok(Json(rendered))
}
