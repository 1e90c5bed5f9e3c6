//! REST API surface over the task-tracking core.
//!
//! Endpoints:
//!   GET    /health          liveness probe
//!   GET    /task            list tasks (optional user/guild filters)
//!   POST   /task            create a task
//!   DELETE /task/{id}       delete a task
//!   GET    /due-date/{id}   read the rendered due date
//!   POST   /due-date/{id}   set the due date
//!   PUT    /assignees/{id}  assign users to a task
//!   PUT    /reminder/{id}   set the reminder

pub mod routes;

use axum::routing::{delete, get, put};
use axum::Router;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared state handed to every request handler.
pub struct AppState {
    conn: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Grants exclusive access to the store connection.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/task",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/task/{id}", delete(routes::tasks::delete_task))
        .route(
            "/due-date/{id}",
            get(routes::due_date::get_due_date).post(routes::due_date::set_due_date),
        )
        .route("/assignees/{id}", put(routes::assignees::assign_users))
        .route("/reminder/{id}", put(routes::reminder::set_reminder))
        .with_state(state)
}
