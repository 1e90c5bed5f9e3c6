//! Assignment repository: the Task–User link store.
//!
//! # Responsibility
//! - Reconcile requested assignees against a task's existing link set.
//! - Own user upsert-by-username so assignment can reference new users.
//!
//! # Invariants
//! - `assign_users` applies all requested links in one transaction or none.
//! - A username is linked to a given task at most once.
//! - Link `position` values record assignment order per task.

use crate::model::task::TaskId;
use crate::model::user::User;
use crate::repo::task_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Repository interface for the task-assignment relation.
pub trait AssigneeRepository {
    /// Links every requested username to the task, creating unknown users.
    ///
    /// Fails without side effects when the task is missing or any requested
    /// username is already linked to it.
    fn assign_users(&mut self, task_id: TaskId, usernames: &[String]) -> RepoResult<usize>;

    /// Reads one user record by username.
    fn get_user(&self, username: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssigneeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAssigneeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["users", "task_assignees"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl AssigneeRepository for SqliteAssigneeRepository<'_> {
    fn assign_users(&mut self, task_id: TaskId, usernames: &[String]) -> RepoResult<usize> {
        for username in usernames {
            User::new(username.as_str()).validate()?;
        }

        // Immediate transaction: the duplicate check and the link inserts
        // must not interleave with another writer on the same task.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !task_exists_in_tx(&tx, task_id)? {
            return Err(RepoError::TaskNotFound(task_id));
        }

        let already_linked = linked_subset_in_tx(&tx, task_id, usernames)?;
        if !already_linked.is_empty() {
            return Err(RepoError::AlreadyAssigned(already_linked));
        }

        let mut position = next_position_in_tx(&tx, task_id)?;
        for username in usernames {
            tx.execute(
                "INSERT OR IGNORE INTO users (username) VALUES (?1);",
                [username.as_str()],
            )?;
            tx.execute(
                "INSERT INTO task_assignees (task_id, username, position)
                 VALUES (?1, ?2, ?3);",
                params![task_id, username.as_str(), position],
            )?;
            position += 1;
        }

        tx.commit()?;
        Ok(usernames.len())
    }

    fn get_user(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT username, server_name FROM users WHERE username = ?1;")?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(User {
                username: row.get("username")?,
                server_name: row.get("server_name")?,
            }));
        }

        Ok(None)
    }
}

fn task_exists_in_tx(tx: &Transaction<'_>, task_id: TaskId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);",
        [task_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns the requested usernames already linked to the task, preserving
/// request order.
fn linked_subset_in_tx(
    tx: &Transaction<'_>,
    task_id: TaskId,
    usernames: &[String],
) -> RepoResult<Vec<String>> {
    let mut linked = Vec::new();
    for username in usernames {
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM task_assignees
                WHERE task_id = ?1
                  AND username = ?2
            );",
            params![task_id, username.as_str()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            linked.push(username.clone());
        }
    }
    Ok(linked)
}

fn next_position_in_tx(tx: &Transaction<'_>, task_id: TaskId) -> RepoResult<i64> {
    let next: i64 = tx.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0)
         FROM task_assignees
         WHERE task_id = ?1;",
        [task_id],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
