//! Reminder route: store a reminder instant on a task.
//!
//! The reminder is pure data; no scheduler or delivery runs off it.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use taskdeck_core::{SqliteTaskRepository, TaskId, TaskService};

use super::{task_error, ApiError};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct ReminderBody {
    pub reminder: String,
}

/// PUT /reminder/{id}: parse and store the reminder timestamp.
pub async fn set_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(body): Json<ReminderBody>,
) -> Result<Json<Value>, ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.set_reminder(id, &body.reminder).map_err(task_error)?;
    Ok(Json(json!({ "message": "reminder has been set" })))
}
