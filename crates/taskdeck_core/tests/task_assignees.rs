use rusqlite::Connection;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    AssigneeRepository, AssignmentError, AssignmentService, SqliteAssigneeRepository,
    SqliteTaskRepository, TaskDraft, TaskId, TaskRepository,
};

fn create_task(conn: &Connection, title: &str) -> TaskId {
    SqliteTaskRepository::new(conn)
        .create_task(&TaskDraft::new(title))
        .unwrap()
}

fn assign(
    conn: &mut Connection,
    task_id: TaskId,
    usernames: &[&str],
) -> Result<usize, AssignmentError> {
    let usernames: Vec<String> = usernames.iter().map(|name| name.to_string()).collect();
    let repo = SqliteAssigneeRepository::try_new(conn).unwrap();
    let mut service = AssignmentService::new(repo);
    service.assign_users(task_id, &usernames)
}

fn assignees(conn: &Connection, task_id: TaskId) -> Vec<String> {
    SqliteTaskRepository::new(conn)
        .get_task(task_id)
        .unwrap()
        .unwrap()
        .assignees
}

fn user_exists(conn: &mut Connection, username: &str) -> bool {
    SqliteAssigneeRepository::try_new(conn)
        .unwrap()
        .get_user(username)
        .unwrap()
        .is_some()
}

#[test]
fn assign_links_users_in_request_order() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "plan sprint");

    let linked = assign(&mut conn, task_id, &["ana#1", "bo#2"]).unwrap();
    assert_eq!(linked, 2);
    assert_eq!(
        assignees(&conn, task_id),
        vec!["ana#1".to_string(), "bo#2".to_string()]
    );
}

#[test]
fn duplicate_assignment_fails_without_partial_application() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "plan sprint");

    assign(&mut conn, task_id, &["ana#1", "bo#2"]).unwrap();

    let err = assign(&mut conn, task_id, &["bo#2", "cal#3"]).unwrap_err();
    match err {
        AssignmentError::DuplicateAssignment(usernames) => {
            assert_eq!(usernames, vec!["bo#2".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The non-duplicate half of the request must not have been applied.
    assert_eq!(
        assignees(&conn, task_id),
        vec!["ana#1".to_string(), "bo#2".to_string()]
    );
    assert!(!user_exists(&mut conn, "cal#3"));
}

#[test]
fn duplicate_error_lists_offenders_in_request_order() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "plan sprint");

    assign(&mut conn, task_id, &["ana#1", "bo#2"]).unwrap();

    let err = assign(&mut conn, task_id, &["bo#2", "ana#1", "new#4"]).unwrap_err();
    match err {
        AssignmentError::DuplicateAssignment(usernames) => {
            assert_eq!(usernames, vec!["bo#2".to_string(), "ana#1".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn assignment_auto_creates_unknown_users() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "onboard newcomer");

    assert!(!user_exists(&mut conn, "fresh#9"));
    assign(&mut conn, task_id, &["fresh#9"]).unwrap();

    let repo = SqliteAssigneeRepository::try_new(&mut conn).unwrap();
    let user = repo.get_user("fresh#9").unwrap().unwrap();
    assert_eq!(user.username, "fresh#9");
    assert_eq!(user.server_name, None);
}

#[test]
fn assigning_existing_user_keeps_their_server_name() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "veteran duty");

    conn.execute(
        "INSERT INTO users (username, server_name) VALUES ('vet#1', 'Old Guard');",
        [],
    )
    .unwrap();

    assign(&mut conn, task_id, &["vet#1"]).unwrap();

    let repo = SqliteAssigneeRepository::try_new(&mut conn).unwrap();
    let user = repo.get_user("vet#1").unwrap().unwrap();
    assert_eq!(user.server_name.as_deref(), Some("Old Guard"));
}

#[test]
fn repeated_username_within_request_links_once() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "double booked");

    let linked = assign(&mut conn, task_id, &["ana#1", "ana#1", "bo#2"]).unwrap();
    assert_eq!(linked, 2);
    assert_eq!(
        assignees(&conn, task_id),
        vec!["ana#1".to_string(), "bo#2".to_string()]
    );
}

#[test]
fn assigning_to_missing_task_creates_no_users() {
    let mut conn = open_db_in_memory().unwrap();

    let err = assign(&mut conn, 99_999, &["ghost#1"]).unwrap_err();
    assert!(matches!(err, AssignmentError::TaskNotFound(99_999)));
    assert!(!user_exists(&mut conn, "ghost#1"));
}

#[test]
fn successive_assignments_append_after_existing_links() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "growing crew");

    assign(&mut conn, task_id, &["ana#1"]).unwrap();
    assign(&mut conn, task_id, &["bo#2"]).unwrap();
    assign(&mut conn, task_id, &["cal#3"]).unwrap();

    let linked = assignees(&conn, task_id);
    assert_eq!(
        linked,
        vec!["ana#1".to_string(), "bo#2".to_string(), "cal#3".to_string()]
    );

    // Uniqueness invariant: no username appears twice after any sequence
    // of successful assignments.
    let mut sorted = linked.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), linked.len());
}

#[test]
fn blank_username_is_rejected_before_any_link() {
    let mut conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "bad input");

    let err = assign(&mut conn, task_id, &["  ", "ok#1"]).unwrap_err();
    assert!(matches!(err, AssignmentError::Failed(_)));

    assert!(assignees(&conn, task_id).is_empty());
    assert!(!user_exists(&mut conn, "ok#1"));
}
