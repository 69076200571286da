//! Database layer for unidb.
//!
//! Owns the single SQLite connection and creates the university schema.

use crate::core::config::StoreConfig;
use crate::core::error::{Result, UniError};
use rusqlite::{Connection, Transaction};
use std::fs;
use std::path::{Path, PathBuf};

/// Database connection and schema operations.
pub struct Db {
    conn: Connection,
    path: PathBuf,
}

impl Db {
    /// Recreate the store from scratch, deleting any existing file first.
    pub fn create(config: &StoreConfig) -> Result<Self> {
        if config.exists() {
            fs::remove_file(config.path())?;
            log::info!("Removed existing store at {}", config.path().display());
        }
        Self::connect(config)
    }

    /// Open an existing store.
    ///
    /// Fails with [`UniError::StorageUnavailable`] when the file is missing,
    /// since SQLite would otherwise silently create an empty one.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if !config.exists() {
            return Err(UniError::StorageUnavailable(config.path.clone()));
        }
        Self::connect(config)
    }

    /// Open an in-memory store, mostly useful for tests.
    pub fn open_in_memory(enforce_foreign_keys: bool) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn, enforce_foreign_keys)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    fn connect(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open(config.path())?;
        Self::configure(&conn, config.enforce_foreign_keys)?;
        log::debug!("Opened store at {}", config.path().display());
        Ok(Self {
            conn,
            path: config.path.clone(),
        })
    }

    fn configure(conn: &Connection, enforce_foreign_keys: bool) -> Result<()> {
        // Declared references are only checked when asked for
        let value = if enforce_foreign_keys { "on" } else { "off" };
        conn.pragma_update(None, "foreign_keys", value)?;
        Ok(())
    }

    /// Initialize the database schema.
    /// Departments first, then Students and Courses, Grades last.
    pub fn init_schema(&self) -> Result<()> {
        self.create_departments_table()?;
        self.create_students_table()?;
        self.create_courses_table()?;
        self.create_grades_table()?;
        log::info!("Created schema at {}", self.path.display());
        Ok(())
    }

    fn create_departments_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE Departments (
                department_id INTEGER PRIMARY KEY,
                department_name TEXT NOT NULL,
                building TEXT
            )",
            [],
        )?;
        Ok(())
    }

    fn create_students_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE Students (
                student_id INTEGER PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE,
                department_id INTEGER,
                enrollment_date TEXT,
                FOREIGN KEY (department_id) REFERENCES Departments(department_id)
            )",
            [],
        )?;
        Ok(())
    }

    fn create_courses_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE Courses (
                course_id INTEGER PRIMARY KEY,
                course_name TEXT NOT NULL,
                department_id INTEGER,
                credits INTEGER,
                FOREIGN KEY (department_id) REFERENCES Departments(department_id)
            )",
            [],
        )?;
        Ok(())
    }

    fn create_grades_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE Grades (
                grade_id INTEGER PRIMARY KEY,
                student_id INTEGER,
                course_id INTEGER,
                grade TEXT,
                semester TEXT,
                FOREIGN KEY (student_id) REFERENCES Students(student_id),
                FOREIGN KEY (course_id) REFERENCES Courses(course_id)
            )",
            [],
        )?;
        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `PRAGMA foreign_keys` is on for this connection.
    pub fn foreign_keys_enforced(&self) -> Result<bool> {
        let on: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(on == 1)
    }

    /// Begin a new transaction.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Close the connection, surfacing any error from the engine.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| UniError::from(e))?;
        log::debug!("Closed store at {}", path.display());
        Ok(())
    }
}

/// Department row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Department {
    pub department_id: i64,
    pub department_name: String,
    pub building: Option<String>,
}

/// Student row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Student {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub enrollment_date: Option<String>,
}

/// Course row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub course_name: String,
    pub department_id: Option<i64>,
    pub credits: Option<i64>,
}

/// Grade row: one (student, course, semester) outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Grade {
    pub grade_id: i64,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub grade: Option<String>,
    pub semester: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_names(db: &Db) -> Vec<String> {
        db.conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY rowid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_database() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("university.db"));
        let db = Db::create(&config).unwrap();
        db.init_schema().unwrap();

        assert!(config.exists());
        assert_eq!(
            table_names(&db),
            vec!["Departments", "Students", "Courses", "Grades"]
        );
    }

    #[test]
    fn test_create_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("university.db"));

        let db = Db::create(&config).unwrap();
        db.init_schema().unwrap();
        db.close().unwrap();

        // Schema creation has no IF NOT EXISTS, so this only works on a fresh file
        let db = Db::create(&config).unwrap();
        db.init_schema().unwrap();
        assert_eq!(table_names(&db).len(), 4);
    }

    #[test]
    fn test_open_missing_store() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("missing.db"));

        let result = Db::open(&config);
        assert!(matches!(result, Err(UniError::StorageUnavailable(_))));
        assert!(!config.exists());
    }

    #[test]
    fn test_schema_twice_fails() {
        let db = Db::open_in_memory(false).unwrap();
        db.init_schema().unwrap();
        assert!(db.init_schema().is_err());
    }

    #[test]
    fn test_foreign_key_pragma() {
        let db = Db::open_in_memory(false).unwrap();
        assert!(!db.foreign_keys_enforced().unwrap());

        let db = Db::open_in_memory(true).unwrap();
        assert!(db.foreign_keys_enforced().unwrap());
    }

    #[test]
    fn test_email_unique() {
        let db = Db::open_in_memory(false).unwrap();
        db.init_schema().unwrap();

        db.conn()
            .execute(
                "INSERT INTO Students VALUES (1, 'A', 'B', 'a@b.edu', NULL, NULL)",
                [],
            )
            .unwrap();
        let result = db.conn().execute(
            "INSERT INTO Students VALUES (2, 'C', 'D', 'a@b.edu', NULL, NULL)",
            [],
        );
        assert!(result.is_err());
    }
}
