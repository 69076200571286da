//! The demonstration catalogues: titled sections of query results run in a
//! fixed order against one store.

use crate::core::db::Db;
use crate::core::error::{Result, UniError};
use crate::core::queries::{self, TupleRow};
use crate::core::writes::{self, WriteOutcome};
use rusqlite::types::Value;

/// One result row, kept both as column values and as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRow {
    pub values: Vec<Value>,
    pub json: serde_json::Value,
}

/// A titled block of result rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub rows: Vec<SectionRow>,
}

impl Section {
    pub fn from_rows<T: TupleRow>(title: &str, rows: &[T]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| {
                Ok(SectionRow {
                    values: row.values(),
                    json: serde_json::to_value(row)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            title: title.to_string(),
            rows,
        })
    }
}

/// A named read query that can be run on its own.
#[derive(Clone, Copy)]
pub struct NamedQuery {
    pub name: &'static str,
    pub title: &'static str,
    run: fn(&Db) -> Result<Section>,
}

impl NamedQuery {
    pub fn run(&self, db: &Db) -> Result<Section> {
        log::debug!("Running query {}", self.name);
        (self.run)(db)
    }
}

macro_rules! named {
    ($name:literal, $title:literal, |$db:ident| $body:expr) => {
        NamedQuery {
            name: $name,
            title: $title,
            run: |$db: &Db| Section::from_rows($title, &$body?),
        }
    };
}

/// Every read query in the catalogue, in the order they are demonstrated.
pub const QUERIES: &[NamedQuery] = &[
    named!("all-students", "All Students", |db| queries::all_students(db)),
    named!("all-departments", "All Departments", |db| {
        queries::all_departments(db)
    }),
    named!("all-courses", "All Courses", |db| queries::all_courses(db)),
    named!("cs-students", "Computer Science Students", |db| {
        queries::students_in_department(db, 1)
    }),
    named!(
        "students-with-departments",
        "Students with their Departments",
        |db| queries::students_with_departments(db)
    ),
    named!(
        "students-per-department",
        "Number of Students per Department",
        |db| queries::student_counts_per_department(db)
    ),
    named!("enrolled-2023", "Students enrolled in 2023", |db| {
        queries::students_enrolled_in(db, "2023")
    }),
    named!(
        "courses-over-3-credits",
        "Courses with more than 3 credits",
        |db| queries::courses_with_credits_above(db, 3)
    ),
    named!(
        "cs-students-by-name",
        "Computer Science Students",
        |db| queries::students_in_department_named(db, "Computer Science")
    ),
    named!("student-grades", "Students and their Grades", |db| {
        queries::student_grades(db)
    }),
    named!("courses-by-department", "Courses by Department", |db| {
        queries::courses_by_department(db)
    }),
    named!(
        "average-grades",
        "Average Grades per Student",
        |db| queries::average_grade_per_student(db)
    ),
    named!(
        "student-count-per-department",
        "Student Count per Department",
        |db| queries::student_counts_per_department(db)
    ),
    named!(
        "largest-department",
        "Department with Most Students",
        |db| queries::department_with_most_students(db)
    ),
    named!(
        "average-credits",
        "Average Credits per Department",
        |db| queries::average_credits_per_department(db)
    ),
    named!(
        "multi-department-students",
        "Students with Courses from Multiple Departments",
        |db| queries::students_in_multiple_departments(db)
    ),
    named!("highest-grades", "Highest Grade per Course", |db| {
        queries::highest_grade_per_course(db)
    }),
    named!("students-without-courses", "Students without Courses", |db| {
        queries::students_without_grades(db)
    }),
];

/// Look up a query by name.
pub fn find_query(name: &str) -> Result<&'static NamedQuery> {
    QUERIES
        .iter()
        .find(|q| q.name == name)
        .ok_or_else(|| UniError::UnknownQuery(name.to_string()))
}

fn run_all(db: &Db, names: &[&str]) -> Result<Vec<Section>> {
    names
        .iter()
        .map(|name| find_query(name)?.run(db))
        .collect()
}

/// Sections printed right after setup.
pub fn basics(db: &Db) -> Result<Vec<Section>> {
    run_all(
        db,
        &[
            "all-students",
            "all-departments",
            "cs-students",
            "students-with-departments",
            "students-per-department",
        ],
    )
}

/// One step of the exercise catalogue.
#[derive(Debug)]
pub enum Exercise {
    Read(&'static str, &'static [&'static str]),
    Write(&'static str),
}

/// The exercise catalogue, in run order.
pub const EXERCISES: &[Exercise] = &[
    Exercise::Read(
        "Exercise 1",
        &["enrolled-2023", "courses-over-3-credits", "cs-students-by-name"],
    ),
    Exercise::Read(
        "Exercise 2",
        &["student-grades", "courses-by-department", "average-grades"],
    ),
    Exercise::Read(
        "Exercise 3",
        &[
            "student-count-per-department",
            "largest-department",
            "average-credits",
        ],
    ),
    Exercise::Write("Exercise 4"),
    Exercise::Read(
        "Exercise 5",
        &[
            "multi-department-students",
            "highest-grades",
            "students-without-courses",
        ],
    ),
];

/// Result of one exercise.
#[derive(Debug)]
pub enum ExerciseReport {
    Read(Vec<Section>),
    Write(Result<Vec<WriteOutcome>>),
}

impl Exercise {
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::Read(label, _) | Exercise::Write(label) => *label,
        }
    }

    /// Run the exercise.
    ///
    /// A failed write group is rolled back and reported inside the returned
    /// [`ExerciseReport::Write`]. A failed read is returned as an error.
    pub fn run(&self, db: &mut Db) -> Result<ExerciseReport> {
        match self {
            Exercise::Read(_, names) => Ok(ExerciseReport::Read(run_all(db, names)?)),
            Exercise::Write(_) => Ok(ExerciseReport::Write(writes::apply_write_group(
                db,
                &writes::exercise_write_group(),
            ))),
        }
    }
}
