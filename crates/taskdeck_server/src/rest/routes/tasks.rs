//! Task collection routes: list, create, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use taskdeck_core::{
    SqliteTaskRepository, Task, TaskDraft, TaskId, TaskListQuery, TaskService,
};

use super::{task_error, ApiError};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user: Option<String>,
    pub guild: Option<i64>,
}

/// GET /task: tasks ordered by due date, optionally filtered.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let query = TaskListQuery {
        assignee: params.user,
        guild: params.guild,
    };
    let tasks = service.list_tasks(&query).map_err(task_error)?;
    Ok(Json(tasks))
}

/// POST /task: create a task. Assignees cannot be set through this
/// endpoint; they go through `PUT /assignees/{id}`.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.create_task(&draft).map_err(task_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// DELETE /task/{id}: remove a task and its assignment links.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    let conn = state.conn();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.delete_task(id).map_err(task_error)?;
    Ok(StatusCode::NO_CONTENT)
}
