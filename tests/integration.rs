//! Integration tests for the unidb CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use unidb::core::config::StoreConfig;
use unidb::core::db::Db;
use unidb::core::queries;

fn unidb(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("unidb").unwrap();
    cmd.current_dir(dir.path());
    cmd.env_remove("UNIDB_DB");
    cmd.env_remove("UNIDB_JSON");
    cmd.env_remove("UNIDB_ENFORCE_FOREIGN_KEYS");
    cmd
}

fn open_store(dir: &TempDir) -> Db {
    Db::open(&StoreConfig::new(dir.path().join("university.db"))).unwrap()
}

#[test]
fn test_setup_creates_database() {
    let temp = TempDir::new().unwrap();

    unidb(&temp)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== All Departments ==="))
        .stdout(predicate::str::contains(
            "(1, 'Computer Science', 'Engineering Building')",
        ))
        .stdout(predicate::str::contains("('Physics', 0)"));

    assert!(temp.path().join("university.db").exists());
}

#[test]
fn test_setup_twice_leaves_only_seed_rows() {
    let temp = TempDir::new().unwrap();

    unidb(&temp).arg("setup").assert().success();
    unidb(&temp).arg("exercises").assert().success();
    unidb(&temp).arg("setup").assert().success();

    let db = open_store(&temp);
    assert_eq!(queries::all_departments(&db).unwrap().len(), 3);
    assert_eq!(queries::all_students(&db).unwrap().len(), 3);
    assert_eq!(queries::all_courses(&db).unwrap().len(), 4);
}

#[test]
fn test_exercises_without_database() {
    let temp = TempDir::new().unwrap();

    unidb(&temp)
        .arg("exercises")
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("unidb setup"));

    // The missing store must not be created as a side effect
    assert!(!temp.path().join("university.db").exists());
}

#[test]
fn test_exercises_workflow() {
    let temp = TempDir::new().unwrap();
    unidb(&temp).arg("setup").assert().success();

    unidb(&temp)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running Exercise 1 Solutions..."))
        .stdout(predicate::str::contains("=== Highest Grade per Course ==="))
        .stdout(predicate::str::contains("('Introduction to Programming', 'B')"))
        .stdout(predicate::str::contains("=== New Student Added Successfully ==="))
        .stdout(predicate::str::contains("=== Course Deleted Successfully ==="));

    let db = open_store(&temp);
    let students = queries::all_students(&db).unwrap();
    assert_eq!(students.len(), 4);
    let john = students.iter().find(|s| s.student_id == 1).unwrap();
    assert_eq!(john.email.as_deref(), Some("new.email@university.edu"));
    assert!(queries::all_courses(&db)
        .unwrap()
        .iter()
        .all(|c| c.course_id != 4));
}

#[test]
fn test_exercises_rerun_rolls_back_write_group() {
    let temp = TempDir::new().unwrap();
    unidb(&temp).arg("setup").assert().success();
    unidb(&temp).arg("exercises").assert().success();

    unidb(&temp)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("An error occurred"))
        .stdout(predicate::str::contains("Running Exercise 5 Solutions..."));

    let db = open_store(&temp);
    assert_eq!(queries::all_students(&db).unwrap().len(), 4);
}

#[test]
fn test_query_command() {
    let temp = TempDir::new().unwrap();
    unidb(&temp).arg("setup").assert().success();

    unidb(&temp)
        .args(["query", "cs-students"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'John', 'Doe'"))
        .stdout(predicate::str::contains("'Bob', 'Johnson'"))
        .stdout(predicate::str::contains("Jane").not());
}

#[test]
fn test_query_json() {
    let temp = TempDir::new().unwrap();
    unidb(&temp).arg("setup").assert().success();

    unidb(&temp)
        .args(["--json", "query", "students-per-department"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"department_name":"Computer Science","student_count":2}"#,
        ));
}

#[test]
fn test_unknown_query_fails() {
    let temp = TempDir::new().unwrap();

    unidb(&temp)
        .args(["query", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown query: nope"));
}

#[test]
fn test_custom_db_path() {
    let temp = TempDir::new().unwrap();

    unidb(&temp)
        .args(["--db", "campus.db", "setup"])
        .assert()
        .success();
    assert!(temp.path().join("campus.db").exists());
    assert!(!temp.path().join("university.db").exists());

    unidb(&temp)
        .args(["--db", "campus.db", "query", "all-courses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'Calculus I'"));
}

#[test]
fn test_list_queries() {
    let temp = TempDir::new().unwrap();

    unidb(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("highest-grades"))
        .stdout(predicate::str::contains("Highest Grade per Course"));
}
