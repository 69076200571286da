//! Read-only query catalogue.
//!
//! Every function here takes the store by shared reference and returns the
//! result rows in the order the engine produces them. Only queries with an
//! explicit `ORDER BY` have a defined order.

use crate::core::db::{Course, Db, Department, Student};
use crate::core::error::Result;
use rusqlite::types::Value;
use rusqlite::{Params, Row};
use serde::Serialize;

/// A result row that can be shown as a flat tuple of column values.
pub trait TupleRow: Serialize {
    fn values(&self) -> Vec<Value>;
}

/// Student name with their department name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDepartment {
    pub first_name: String,
    pub last_name: String,
    pub department_name: String,
}

/// Number of students enrolled in a department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCount {
    pub department_name: String,
    pub student_count: i64,
}

/// A letter grade a student received in a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCourseGrade {
    pub first_name: String,
    pub last_name: String,
    pub course_name: String,
    pub grade: Option<String>,
}

/// A course offered by a department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCourse {
    pub department_name: String,
    pub course_name: String,
}

/// Grade-point average of one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAverage {
    pub first_name: String,
    pub last_name: String,
    pub average_grade: f64,
}

/// Mean credit count of a department's courses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentAverage {
    pub department_name: String,
    pub avg_credits: Option<f64>,
}

/// How many distinct departments a student has taken courses from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDepartmentSpread {
    pub first_name: String,
    pub last_name: String,
    pub department_count: i64,
}

/// Highest letter grade recorded in a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseTopGrade {
    pub course_name: String,
    pub highest_grade: Option<String>,
}

const STUDENT_COLUMNS: &str =
    "s.student_id, s.first_name, s.last_name, s.email, s.department_id, s.enrollment_date";

fn fetch<T, P, F>(db: &Db, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    log::debug!("query: {}", sql.split_whitespace().collect::<Vec<_>>().join(" "));
    let mut stmt = db.conn().prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        student_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        department_id: row.get(4)?,
        enrollment_date: row.get(5)?,
    })
}

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        course_id: row.get(0)?,
        course_name: row.get(1)?,
        department_id: row.get(2)?,
        credits: row.get(3)?,
    })
}

fn department_count_from_row(row: &Row<'_>) -> rusqlite::Result<DepartmentCount> {
    Ok(DepartmentCount {
        department_name: row.get(0)?,
        student_count: row.get(1)?,
    })
}

/// All students.
pub fn all_students(db: &Db) -> Result<Vec<Student>> {
    fetch(
        db,
        &format!("SELECT {STUDENT_COLUMNS} FROM Students s"),
        [],
        student_from_row,
    )
}

/// All departments.
pub fn all_departments(db: &Db) -> Result<Vec<Department>> {
    fetch(
        db,
        "SELECT department_id, department_name, building FROM Departments",
        [],
        |row| {
            Ok(Department {
                department_id: row.get(0)?,
                department_name: row.get(1)?,
                building: row.get(2)?,
            })
        },
    )
}

/// All courses.
pub fn all_courses(db: &Db) -> Result<Vec<Course>> {
    fetch(
        db,
        "SELECT course_id, course_name, department_id, credits FROM Courses",
        [],
        course_from_row,
    )
}

/// Students belonging to the department with the given id.
pub fn students_in_department(db: &Db, department_id: i64) -> Result<Vec<Student>> {
    fetch(
        db,
        &format!("SELECT {STUDENT_COLUMNS} FROM Students s WHERE s.department_id = ?1"),
        [department_id],
        student_from_row,
    )
}

/// Students with the name of their department. Students without a
/// matching department are left out.
pub fn students_with_departments(db: &Db) -> Result<Vec<StudentDepartment>> {
    fetch(
        db,
        "SELECT s.first_name, s.last_name, d.department_name
         FROM Students s
         JOIN Departments d ON s.department_id = d.department_id",
        [],
        |row| {
            Ok(StudentDepartment {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                department_name: row.get(2)?,
            })
        },
    )
}

/// Student count for every department, including empty ones.
pub fn student_counts_per_department(db: &Db) -> Result<Vec<DepartmentCount>> {
    fetch(
        db,
        "SELECT d.department_name, COUNT(s.student_id) AS student_count
         FROM Departments d
         LEFT JOIN Students s ON d.department_id = s.department_id
         GROUP BY d.department_name",
        [],
        department_count_from_row,
    )
}

/// Students whose enrollment date starts with the given year.
pub fn students_enrolled_in(db: &Db, year: &str) -> Result<Vec<Student>> {
    fetch(
        db,
        &format!("SELECT {STUDENT_COLUMNS} FROM Students s WHERE s.enrollment_date LIKE ?1"),
        [format!("{year}%")],
        student_from_row,
    )
}

/// Courses worth strictly more than `credits`.
pub fn courses_with_credits_above(db: &Db, credits: i64) -> Result<Vec<Course>> {
    fetch(
        db,
        "SELECT course_id, course_name, department_id, credits FROM Courses WHERE credits > ?1",
        [credits],
        course_from_row,
    )
}

/// Students in the department with the given name.
pub fn students_in_department_named(db: &Db, department_name: &str) -> Result<Vec<Student>> {
    fetch(
        db,
        &format!(
            "SELECT {STUDENT_COLUMNS} FROM Students s
             JOIN Departments d ON s.department_id = d.department_id
             WHERE d.department_name = ?1"
        ),
        [department_name],
        student_from_row,
    )
}

/// Every recorded grade with student and course names.
pub fn student_grades(db: &Db) -> Result<Vec<StudentCourseGrade>> {
    fetch(
        db,
        "SELECT s.first_name, s.last_name, c.course_name, g.grade
         FROM Students s
         JOIN Grades g ON s.student_id = g.student_id
         JOIN Courses c ON g.course_id = c.course_id",
        [],
        |row| {
            Ok(StudentCourseGrade {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                course_name: row.get(2)?,
                grade: row.get(3)?,
            })
        },
    )
}

/// Courses offered by each department, sorted by department name.
pub fn courses_by_department(db: &Db) -> Result<Vec<DepartmentCourse>> {
    fetch(
        db,
        "SELECT d.department_name, c.course_name
         FROM Departments d
         JOIN Courses c ON d.department_id = c.department_id
         ORDER BY d.department_name",
        [],
        |row| {
            Ok(DepartmentCourse {
                department_name: row.get(0)?,
                course_name: row.get(1)?,
            })
        },
    )
}

/// Average grade points per student who has at least one grade.
///
/// A = 4.0, A- = 3.7, B+ = 3.3, B = 3.0, B- = 2.7, anything else 0.
pub fn average_grade_per_student(db: &Db) -> Result<Vec<StudentAverage>> {
    fetch(
        db,
        "SELECT s.first_name, s.last_name,
                AVG(CASE
                    WHEN g.grade = 'A' THEN 4.0
                    WHEN g.grade = 'A-' THEN 3.7
                    WHEN g.grade = 'B+' THEN 3.3
                    WHEN g.grade = 'B' THEN 3.0
                    WHEN g.grade = 'B-' THEN 2.7
                    ELSE 0
                END) AS average_grade
         FROM Students s
         JOIN Grades g ON s.student_id = g.student_id
         GROUP BY s.student_id, s.first_name, s.last_name",
        [],
        |row| {
            Ok(StudentAverage {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                average_grade: row.get(2)?,
            })
        },
    )
}

/// The department with the most students. Ties resolve to whichever the
/// engine sorts first.
pub fn department_with_most_students(db: &Db) -> Result<Vec<DepartmentCount>> {
    fetch(
        db,
        "SELECT d.department_name, COUNT(s.student_id) AS student_count
         FROM Departments d
         LEFT JOIN Students s ON d.department_id = s.department_id
         GROUP BY d.department_name
         ORDER BY student_count DESC
         LIMIT 1",
        [],
        department_count_from_row,
    )
}

/// Mean course credits per department that offers courses.
pub fn average_credits_per_department(db: &Db) -> Result<Vec<DepartmentAverage>> {
    fetch(
        db,
        "SELECT d.department_name, AVG(c.credits) AS avg_credits
         FROM Departments d
         JOIN Courses c ON d.department_id = c.department_id
         GROUP BY d.department_name",
        [],
        |row| {
            Ok(DepartmentAverage {
                department_name: row.get(0)?,
                avg_credits: row.get(1)?,
            })
        },
    )
}

/// Students graded in courses from more than one department.
pub fn students_in_multiple_departments(db: &Db) -> Result<Vec<StudentDepartmentSpread>> {
    fetch(
        db,
        "SELECT s.first_name, s.last_name, COUNT(DISTINCT c.department_id) AS dept_count
         FROM Students s
         JOIN Grades g ON s.student_id = g.student_id
         JOIN Courses c ON g.course_id = c.course_id
         GROUP BY s.student_id, s.first_name, s.last_name
         HAVING COUNT(DISTINCT c.department_id) > 1",
        [],
        |row| {
            Ok(StudentDepartmentSpread {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                department_count: row.get(2)?,
            })
        },
    )
}

/// Highest grade per course.
///
/// Uses `MAX` over the grade text, so the comparison is lexical: "B" beats
/// "A" and "B+" beats "B". This does not match the grade-point mapping used
/// by [`average_grade_per_student`].
pub fn highest_grade_per_course(db: &Db) -> Result<Vec<CourseTopGrade>> {
    fetch(
        db,
        "SELECT c.course_name, MAX(g.grade) AS highest_grade
         FROM Courses c
         JOIN Grades g ON c.course_id = g.course_id
         GROUP BY c.course_id, c.course_name",
        [],
        |row| {
            Ok(CourseTopGrade {
                course_name: row.get(0)?,
                highest_grade: row.get(1)?,
            })
        },
    )
}

/// Students with no recorded grade.
pub fn students_without_grades(db: &Db) -> Result<Vec<Student>> {
    fetch(
        db,
        &format!(
            "SELECT {STUDENT_COLUMNS}
             FROM Students s
             LEFT JOIN Grades g ON s.student_id = g.student_id
             WHERE g.grade_id IS NULL"
        ),
        [],
        student_from_row,
    )
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn opt_text(value: &Option<String>) -> Value {
    value.as_deref().map_or(Value::Null, text)
}

fn opt_int(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

impl TupleRow for Department {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.department_id),
            text(&self.department_name),
            opt_text(&self.building),
        ]
    }
}

impl TupleRow for Student {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.student_id),
            text(&self.first_name),
            text(&self.last_name),
            opt_text(&self.email),
            opt_int(self.department_id),
            opt_text(&self.enrollment_date),
        ]
    }
}

impl TupleRow for Course {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.course_id),
            text(&self.course_name),
            opt_int(self.department_id),
            opt_int(self.credits),
        ]
    }
}

impl TupleRow for StudentDepartment {
    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.first_name),
            text(&self.last_name),
            text(&self.department_name),
        ]
    }
}

impl TupleRow for DepartmentCount {
    fn values(&self) -> Vec<Value> {
        vec![text(&self.department_name), Value::Integer(self.student_count)]
    }
}

impl TupleRow for StudentCourseGrade {
    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.first_name),
            text(&self.last_name),
            text(&self.course_name),
            opt_text(&self.grade),
        ]
    }
}

impl TupleRow for DepartmentCourse {
    fn values(&self) -> Vec<Value> {
        vec![text(&self.department_name), text(&self.course_name)]
    }
}

impl TupleRow for StudentAverage {
    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.first_name),
            text(&self.last_name),
            Value::Real(self.average_grade),
        ]
    }
}

impl TupleRow for DepartmentAverage {
    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.department_name),
            self.avg_credits.map_or(Value::Null, Value::Real),
        ]
    }
}

impl TupleRow for StudentDepartmentSpread {
    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.first_name),
            text(&self.last_name),
            Value::Integer(self.department_count),
        ]
    }
}

impl TupleRow for CourseTopGrade {
    fn values(&self) -> Vec<Value> {
        vec![text(&self.course_name), opt_text(&self.highest_grade)]
    }
}
