//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and ordered-list APIs over canonical `tasks` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - List output orders by due date ascending with undated tasks strictly
//!   after dated ones, ties broken by ascending id.
//! - Read paths reject corrupt persisted state instead of masking it.

use crate::db::DbError;
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError};
use crate::model::user::UserValidationError;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    due_date,
    reminder,
    guild
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    UserValidation(UserValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    AlreadyAssigned(Vec<String>),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UserValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::AlreadyAssigned(usernames) => {
                write!(f, "already assigned: {}", usernames.join(", "))
            }
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::UserValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::UserValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing tasks. Both filters compose with AND
/// semantics; an unmatched filter yields an empty result, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Restrict to tasks whose assignee set contains this exact username.
    pub assignee: Option<String>,
    /// Restrict to tasks carrying this exact guild tag.
    pub guild: Option<i64>,
}

/// Repository interface for task CRUD and ordered listing.
pub trait TaskRepository {
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn set_due_date(&self, id: TaskId, due_date: DateTime<Utc>) -> RepoResult<()>;
    fn set_reminder(&self, id: TaskId, reminder: DateTime<Utc>) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<TaskId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (title, due_date, reminder, guild)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.title.as_str(),
                draft.due_date.map(instant_to_db),
                draft.reminder.map(instant_to_db),
                draft.guild,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            task.assignees = load_assignees(self.conn, task.id)?;
            return Ok(Some(task));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(assignee) = query.assignee.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM task_assignees ta
                    WHERE ta.task_id = tasks.id
                      AND ta.username = ?
                )",
            );
            bind_values.push(Value::Text(assignee.clone()));
        }

        if let Some(guild) = query.guild {
            sql.push_str(" AND guild = ?");
            bind_values.push(Value::Integer(guild));
        }

        // Dated tasks first in ascending order, the undated block after,
        // creation order inside every tie group.
        sql.push_str(" ORDER BY due_date IS NULL, due_date ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            task.assignees = load_assignees(self.conn, task.id)?;
            tasks.push(task);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn set_due_date(&self, id: TaskId, due_date: DateTime<Utc>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET due_date = ?2 WHERE id = ?1;",
            params![id, instant_to_db(due_date)],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn set_reminder(&self, id: TaskId, reminder: DateTime<Utc>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET reminder = ?2 WHERE id = ?1;",
            params![id, instant_to_db(reminder)],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let due_date = row
        .get::<_, Option<i64>>("due_date")?
        .map(instant_from_db)
        .transpose()?;
    let reminder = row
        .get::<_, Option<i64>>("reminder")?
        .map(instant_from_db)
        .transpose()?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        due_date,
        reminder,
        guild: row.get("guild")?,
        assignees: Vec::new(),
    })
}

/// Loads a task's assignee usernames in assignment order.
pub(crate) fn load_assignees(conn: &Connection, task_id: TaskId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT username
         FROM task_assignees
         WHERE task_id = ?1
         ORDER BY position ASC;",
    )?;

    let mut rows = stmt.query([task_id])?;
    let mut assignees = Vec::new();
    while let Some(row) = rows.next()? {
        assignees.push(row.get(0)?);
    }

    Ok(assignees)
}

fn instant_to_db(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

fn instant_from_db(value: i64) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value)
        .single()
        .ok_or_else(|| RepoError::InvalidData(format!("epoch milliseconds `{value}` out of range")))
}
