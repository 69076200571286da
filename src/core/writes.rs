//! Write catalogue: single-row insert, update and delete.
//!
//! Writes are applied in groups. A group runs inside one transaction and
//! either commits as a whole or leaves the store untouched.

use crate::core::db::Db;
use crate::core::error::Result;
use rusqlite::{params, Transaction};
use serde::Serialize;

/// Column values for a new student row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStudent {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: i64,
    pub enrollment_date: String,
}

/// One statement of a write group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WriteOp {
    InsertStudent(NewStudent),
    UpdateStudentEmail { student_id: i64, email: String },
    DeleteCourse { course_id: i64 },
}

impl WriteOp {
    /// Confirmation printed once the group containing this op commits.
    pub fn confirmation(&self) -> &'static str {
        match self {
            WriteOp::InsertStudent(_) => "New Student Added Successfully",
            WriteOp::UpdateStudentEmail { .. } => "Student Email Updated Successfully",
            WriteOp::DeleteCourse { .. } => "Course Deleted Successfully",
        }
    }

    fn apply(&self, tx: &Transaction<'_>) -> rusqlite::Result<usize> {
        match self {
            WriteOp::InsertStudent(s) => tx.execute(
                "INSERT INTO Students (student_id, first_name, last_name, email, department_id, enrollment_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    s.student_id,
                    s.first_name,
                    s.last_name,
                    s.email,
                    s.department_id,
                    s.enrollment_date
                ],
            ),
            WriteOp::UpdateStudentEmail { student_id, email } => tx.execute(
                "UPDATE Students SET email = ?1 WHERE student_id = ?2",
                params![email, student_id],
            ),
            WriteOp::DeleteCourse { course_id } => {
                tx.execute("DELETE FROM Courses WHERE course_id = ?1", [course_id])
            }
        }
    }
}

/// What a committed op did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOutcome {
    pub op: WriteOp,
    pub rows_affected: usize,
}

/// Apply every op in order inside one transaction.
///
/// On the first engine error the transaction is rolled back and that error
/// is returned; none of the group's changes persist.
pub fn apply_write_group(db: &mut Db, ops: &[WriteOp]) -> Result<Vec<WriteOutcome>> {
    let tx = db.transaction()?;
    let mut outcomes = Vec::with_capacity(ops.len());

    for op in ops {
        match op.apply(&tx) {
            Ok(rows_affected) => {
                log::debug!("{:?} affected {} row(s)", op, rows_affected);
                outcomes.push(WriteOutcome {
                    op: op.clone(),
                    rows_affected,
                });
            }
            Err(e) => {
                log::warn!("Rolling back write group after {:?}: {}", op, e);
                tx.rollback()?;
                return Err(e.into());
            }
        }
    }

    tx.commit()?;
    log::info!("Committed write group of {} statement(s)", outcomes.len());
    Ok(outcomes)
}

/// The write group run by the exercise catalogue.
pub fn exercise_write_group() -> Vec<WriteOp> {
    vec![
        WriteOp::InsertStudent(NewStudent {
            student_id: 4,
            first_name: "Alice".to_string(),
            last_name: "Williams".to_string(),
            email: "alice.williams@university.edu".to_string(),
            department_id: 2,
            enrollment_date: "2023-09-01".to_string(),
        }),
        WriteOp::UpdateStudentEmail {
            student_id: 1,
            email: "new.email@university.edu".to_string(),
        },
        WriteOp::DeleteCourse { course_id: 4 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UniError;
    use crate::core::{queries, seed};

    fn seeded(enforce_foreign_keys: bool) -> Db {
        let mut db = Db::open_in_memory(enforce_foreign_keys).unwrap();
        db.init_schema().unwrap();
        seed::insert_seed_data(&mut db).unwrap();
        db
    }

    #[test]
    fn test_exercise_group_applies() {
        let mut db = seeded(false);
        let outcomes = apply_write_group(&mut db, &exercise_write_group()).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.rows_affected == 1));

        let students = queries::all_students(&db).unwrap();
        assert_eq!(students.len(), 4);
        assert!(students.iter().any(|s| s.first_name == "Alice"));

        let john = students.iter().find(|s| s.student_id == 1).unwrap();
        assert_eq!(john.email.as_deref(), Some("new.email@university.edu"));

        let courses = queries::all_courses(&db).unwrap();
        assert_eq!(courses.len(), 3);
        assert!(courses.iter().all(|c| c.course_id != 4));
    }

    #[test]
    fn test_duplicate_email_rolls_back_group() {
        let mut db = seeded(false);
        let ops = vec![
            WriteOp::DeleteCourse { course_id: 4 },
            WriteOp::InsertStudent(NewStudent {
                student_id: 4,
                first_name: "Alice".to_string(),
                last_name: "Williams".to_string(),
                email: "jane.smith@university.edu".to_string(),
                department_id: 2,
                enrollment_date: "2023-09-01".to_string(),
            }),
        ];

        let result = apply_write_group(&mut db, &ops);
        assert!(matches!(result, Err(UniError::Storage(_))));

        assert_eq!(queries::all_students(&db).unwrap(), seed::students());
        assert_eq!(queries::all_courses(&db).unwrap(), seed::courses());
    }

    #[test]
    fn test_failing_update_undoes_earlier_insert() {
        let mut db = seeded(false);
        let mut ops = exercise_write_group();
        // Collides with Bob's address
        ops[1] = WriteOp::UpdateStudentEmail {
            student_id: 1,
            email: "bob.johnson@university.edu".to_string(),
        };

        assert!(apply_write_group(&mut db, &ops).is_err());
        assert_eq!(queries::all_students(&db).unwrap(), seed::students());
    }

    #[test]
    fn test_rerun_fails_and_keeps_first_result() {
        let mut db = seeded(false);
        apply_write_group(&mut db, &exercise_write_group()).unwrap();
        let after_first = queries::all_students(&db).unwrap();

        assert!(apply_write_group(&mut db, &exercise_write_group()).is_err());
        assert_eq!(queries::all_students(&db).unwrap(), after_first);
    }

    #[test]
    fn test_missing_keys_affect_nothing() {
        let mut db = seeded(false);
        let ops = vec![
            WriteOp::UpdateStudentEmail {
                student_id: 42,
                email: "ghost@university.edu".to_string(),
            },
            WriteOp::DeleteCourse { course_id: 42 },
        ];
        let outcomes = apply_write_group(&mut db, &ops).unwrap();
        assert!(outcomes.iter().all(|o| o.rows_affected == 0));
    }

    #[test]
    fn test_foreign_keys_only_when_enforced() {
        let orphan = vec![WriteOp::InsertStudent(NewStudent {
            student_id: 10,
            first_name: "Orphan".to_string(),
            last_name: "Student".to_string(),
            email: "orphan@university.edu".to_string(),
            department_id: 99,
            enrollment_date: "2029-01-01".to_string(),
        })];

        let mut db = seeded(false);
        assert!(apply_write_group(&mut db, &orphan).is_ok());

        let mut db = seeded(true);
        assert!(apply_write_group(&mut db, &orphan).is_err());
        assert_eq!(queries::all_students(&db).unwrap().len(), 3);
    }

    #[test]
    fn test_confirmations() {
        let ops = exercise_write_group();
        assert_eq!(ops[0].confirmation(), "New Student Added Successfully");
        assert_eq!(ops[1].confirmation(), "Student Email Updated Successfully");
        assert_eq!(ops[2].confirmation(), "Course Deleted Successfully");
    }
}
