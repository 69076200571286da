//! Fixed seed rows loaded at setup time.

use crate::core::db::{Course, Db, Department, Grade, Student};
use crate::core::error::Result;
use rusqlite::params;

/// Departments: (id, name, building).
pub const DEPARTMENTS: &[(i64, &str, &str)] = &[
    (1, "Computer Science", "Engineering Building"),
    (2, "Mathematics", "Science Building"),
    (3, "Physics", "Science Building"),
];

/// Students: (id, first name, last name, email, department id, enrollment date).
pub const STUDENTS: &[(i64, &str, &str, &str, i64, &str)] = &[
    (1, "John", "Doe", "john.doe@university.edu", 1, "2028-09-01"),
    (2, "Jane", "Smith", "jane.smith@university.edu", 2, "2028-09-01"),
    (3, "Bob", "Johnson", "bob.johnson@university.edu", 1, "2028-09-01"),
];

/// Courses: (id, name, department id, credits).
pub const COURSES: &[(i64, &str, i64, i64)] = &[
    (1, "Introduction to Programming", 1, 3),
    (2, "Database Systems", 1, 3),
    (3, "Calculus I", 2, 4),
    (4, "Physics I", 3, 4),
];

/// Grades: (id, student id, course id, grade, semester).
pub const GRADES: &[(i64, i64, i64, &str, &str)] = &[
    (1, 1, 1, "A", "Fall 2028"),
    (2, 1, 2, "B+", "Fall 2028"),
    (3, 2, 3, "A-", "Fall 2028"),
    (4, 3, 1, "B", "Fall 2028"),
];

/// Insert all seed rows in dependency order inside one transaction.
///
/// Assumes a freshly created schema; running it twice fails on the
/// primary keys and leaves the first copy untouched.
pub fn insert_seed_data(db: &mut Db) -> Result<()> {
    let tx = db.transaction()?;

    {
        let mut stmt = tx.prepare("INSERT INTO Departments VALUES (?1, ?2, ?3)")?;
        for &(id, name, building) in DEPARTMENTS {
            stmt.execute(params![id, name, building])?;
        }

        let mut stmt = tx.prepare("INSERT INTO Students VALUES (?1, ?2, ?3, ?4, ?5, ?6)")?;
        for &(id, first, last, email, dept, enrolled) in STUDENTS {
            stmt.execute(params![id, first, last, email, dept, enrolled])?;
        }

        let mut stmt = tx.prepare("INSERT INTO Courses VALUES (?1, ?2, ?3, ?4)")?;
        for &(id, name, dept, credits) in COURSES {
            stmt.execute(params![id, name, dept, credits])?;
        }

        let mut stmt = tx.prepare("INSERT INTO Grades VALUES (?1, ?2, ?3, ?4, ?5)")?;
        for &(id, student, course, grade, semester) in GRADES {
            stmt.execute(params![id, student, course, grade, semester])?;
        }
    }

    tx.commit()?;
    log::info!(
        "Seeded {} departments, {} students, {} courses, {} grades",
        DEPARTMENTS.len(),
        STUDENTS.len(),
        COURSES.len(),
        GRADES.len()
    );
    Ok(())
}

/// Seed departments as typed rows.
pub fn departments() -> Vec<Department> {
    DEPARTMENTS
        .iter()
        .map(|&(id, name, building)| Department {
            department_id: id,
            department_name: name.to_string(),
            building: Some(building.to_string()),
        })
        .collect()
}

/// Seed students as typed rows.
pub fn students() -> Vec<Student> {
    STUDENTS
        .iter()
        .map(|&(id, first, last, email, dept, enrolled)| Student {
            student_id: id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(email.to_string()),
            department_id: Some(dept),
            enrollment_date: Some(enrolled.to_string()),
        })
        .collect()
}

/// Seed courses as typed rows.
pub fn courses() -> Vec<Course> {
    COURSES
        .iter()
        .map(|&(id, name, dept, credits)| Course {
            course_id: id,
            course_name: name.to_string(),
            department_id: Some(dept),
            credits: Some(credits),
        })
        .collect()
}

/// Seed grades as typed rows.
pub fn grades() -> Vec<Grade> {
    GRADES
        .iter()
        .map(|&(id, student, course, grade, semester)| Grade {
            grade_id: id,
            student_id: Some(student),
            course_id: Some(course),
            grade: Some(grade.to_string()),
            semester: Some(semester.to_string()),
        })
        .collect()
}
