//! Student business logic - Handles all student-related operations.
//!
//! Profile fields are edited through [`update_student`]. The parent link goes through
//! [`crate::core::link`] and the teacher link through [`crate::core::teacher`], so
//! the linkage rules live in one place.

use crate::{
    core::validation,
    entities::{Parent, Student, StudentStatus, Teacher, parent, student, teacher},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Profile details submitted when creating or editing a student.
#[derive(Debug, Clone)]
pub struct StudentInput {
    /// Full name (required)
    pub name: String,
    /// Class or section (required)
    pub class_name: String,
    /// Grade level (required)
    pub grade_level: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Phone number (required)
    pub contact_number: String,
    /// Email address
    pub email: Option<String>,
    /// Home address (required)
    pub address: String,
    /// Date the student enrolled
    pub enrollment_date: NaiveDate,
    /// Enrollment status
    pub status: StudentStatus,
    /// Free-form notes
    pub notes: Option<String>,
}

impl From<&student::Model> for StudentInput {
    fn from(student: &student::Model) -> Self {
        Self {
            name: student.name.clone(),
            class_name: student.class_name.clone(),
            grade_level: student.grade_level.clone(),
            date_of_birth: student.date_of_birth,
            contact_number: student.contact_number.clone(),
            email: student.email.clone(),
            address: student.address.clone(),
            enrollment_date: student.enrollment_date,
            status: student.status,
            notes: student.notes.clone(),
        }
    }
}

struct ValidStudent {
    name: String,
    class_name: String,
    grade_level: String,
    contact_number: String,
    email: Option<String>,
    address: String,
    notes: Option<String>,
}

impl StudentInput {
    fn validate(&self) -> Result<ValidStudent> {
        Ok(ValidStudent {
            name: validation::required("name", &self.name)?,
            class_name: validation::required("class_name", &self.class_name)?,
            grade_level: validation::required("grade_level", &self.grade_level)?,
            contact_number: validation::required("contact_number", &self.contact_number)?,
            email: validation::optional_email("email", self.email.as_deref())?,
            address: validation::required("address", &self.address)?,
            notes: validation::optional(self.notes.as_deref()),
        })
    }
}

/// A student together with its related parent and teacher rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDetails {
    /// The student record
    pub student: student::Model,
    /// Linked parent, if any
    pub parent: Option<parent::Model>,
    /// Assigned teacher, if any
    pub teacher: Option<teacher::Model>,
}

impl StudentDetails {
    /// Name of the linked parent, if any.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.name.as_str())
    }

    /// Name of the assigned teacher, if any.
    #[must_use]
    pub fn teacher_name(&self) -> Option<&str> {
        self.teacher.as_ref().map(|t| t.name.as_str())
    }
}

/// Creates a new student, optionally linked to a parent and a teacher.
///
/// Both references must exist. A student created under a parent who has already paid
/// starts out paid as of the parent's payment date.
pub async fn create_student(
    db: &DatabaseConnection,
    input: StudentInput,
    parent_id: Option<Uuid>,
    teacher_id: Option<Uuid>,
) -> Result<student::Model> {
    let valid = input.validate()?;

    let parent = match parent_id {
        Some(id) => Some(
            Parent::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found("Parent", id))?,
        ),
        None => None,
    };
    if let Some(id) = teacher_id {
        Teacher::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Teacher", id))?;
    }

    let (payment_status, payment_date) = match &parent {
        Some(p) if p.payment_status => (true, p.payment_date),
        _ => (false, None),
    };

    let now = chrono::Utc::now();
    let student = student::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(valid.name),
        class_name: Set(valid.class_name),
        grade_level: Set(valid.grade_level),
        date_of_birth: Set(input.date_of_birth),
        contact_number: Set(valid.contact_number),
        email: Set(valid.email),
        address: Set(valid.address),
        enrollment_date: Set(input.enrollment_date),
        status: Set(input.status),
        payment_status: Set(payment_status),
        payment_date: Set(payment_date),
        parent_id: Set(parent_id),
        teacher_id: Set(teacher_id),
        notes: Set(valid.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = student.insert(db).await?;
    info!(student_id = %result.id, "Created student {} in {}", result.name, result.class_name);
    Ok(result)
}

/// Finds a student by its unique ID.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    student_id: Uuid,
) -> Result<Option<student::Model>> {
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by name, ignoring case and surrounding whitespace.
pub async fn get_student_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<student::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(get_all_students(db)
        .await?
        .into_iter()
        .find(|s| s.name.to_lowercase() == wanted))
}

/// Retrieves all students ordered alphabetically by name.
pub async fn get_all_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a student's profile fields. Links and payment status are unchanged.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: Uuid,
    input: StudentInput,
) -> Result<student::Model> {
    let valid = input.validate()?;

    let mut student: student::ActiveModel = Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Student", student_id))?
        .into();

    student.name = Set(valid.name);
    student.class_name = Set(valid.class_name);
    student.grade_level = Set(valid.grade_level);
    student.date_of_birth = Set(input.date_of_birth);
    student.contact_number = Set(valid.contact_number);
    student.email = Set(valid.email);
    student.address = Set(valid.address);
    student.enrollment_date = Set(input.enrollment_date);
    student.status = Set(input.status);
    student.notes = Set(valid.notes);
    student.updated_at = Set(chrono::Utc::now());

    student.update(db).await.map_err(Into::into)
}

/// Deletes a student.
pub async fn delete_student(db: &DatabaseConnection, student_id: Uuid) -> Result<()> {
    let result = Student::delete_by_id(student_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Student", student_id));
    }
    info!(%student_id, "Deleted student");
    Ok(())
}

/// Fetches a student together with its parent and teacher.
pub async fn get_student_details(
    db: &DatabaseConnection,
    student_id: Uuid,
) -> Result<Option<StudentDetails>> {
    let Some(student) = get_student_by_id(db, student_id).await? else {
        return Ok(None);
    };
    let parent = student.find_related(Parent).one(db).await?;
    let teacher = student.find_related(Teacher).one(db).await?;
    Ok(Some(StudentDetails {
        student,
        parent,
        teacher,
    }))
}

/// Fetches every student with its parent and teacher, ordered by student name.
///
/// Uses three queries regardless of the number of students.
pub async fn list_student_details(db: &DatabaseConnection) -> Result<Vec<StudentDetails>> {
    let students = get_all_students(db).await?;
    let parents: HashMap<Uuid, parent::Model> = Parent::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let teachers: HashMap<Uuid, teacher::Model> = Teacher::find()
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(students
        .into_iter()
        .map(|student| StudentDetails {
            parent: student.parent_id.and_then(|id| parents.get(&id).cloned()),
            teacher: student.teacher_id.and_then(|id| teachers.get(&id).cloned()),
            student,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::payment;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_student_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = student_input("Alice", "Grade 3-A");
        input.class_name = " ".to_string();
        let result = create_student(&db, input, None, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "class_name",
                ..
            }
        ));

        let mut input = student_input("Alice", "Grade 3-A");
        input.email = Some("alice-at-example".to_string());
        let result = create_student(&db, input, None, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "email", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let student = create_test_student(&db, "Alice", "Grade 3-A").await?;
        assert_eq!(student.name, "Alice");
        assert_eq!(student.status, StudentStatus::Active);
        assert!(!student.payment_status);
        assert_eq!(student.parent_id, None);

        let found = get_student_by_id(&db, student.id).await?.unwrap();
        assert_eq!(found, student);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_unknown_parent() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_student(
            &db,
            student_input("Alice", "Grade 3-A"),
            Some(Uuid::new_v4()),
            None,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Parent",
                ..
            }
        ));
        assert!(get_all_students(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_unknown_teacher() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_student(
            &db,
            student_input("Alice", "Grade 3-A"),
            None,
            Some(Uuid::new_v4()),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Teacher",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_under_paid_parent_starts_paid() -> Result<()> {
        let (db, parent, _students) = setup_with_family().await?;
        payment::record_payment(&db, test_payment(parent.id, 500.0)).await?;

        let carlo = create_student(
            &db,
            student_input("Carlo", "Grade 1-A"),
            Some(parent.id),
            None,
        )
        .await?;
        assert!(carlo.payment_status);
        assert_eq!(carlo.payment_date, Some(test_date()));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_student_keeps_links() -> Result<()> {
        let (db, parent, students) = setup_with_family().await?;
        let alice = &students[0];

        let mut input = student_input("Alice Doe", "Grade 4-A");
        input.status = StudentStatus::Transferred;
        let updated = update_student(&db, alice.id, input).await?;

        assert_eq!(updated.name, "Alice Doe");
        assert_eq!(updated.class_name, "Grade 4-A");
        assert_eq!(updated.status, StudentStatus::Transferred);
        assert_eq!(updated.parent_id, Some(parent.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_from_stored_record_keeps_profile() -> Result<()> {
        let (db, parent, students) = setup_with_family().await?;
        let bob = &students[1];

        let updated = update_student(
            &db,
            bob.id,
            StudentInput {
                class_name: "Grade 6-A".to_string(),
                ..StudentInput::from(bob)
            },
        )
        .await?;

        assert_eq!(updated.class_name, "Grade 6-A");
        assert_eq!(updated.name, bob.name);
        assert_eq!(updated.grade_level, bob.grade_level);
        assert_eq!(updated.date_of_birth, bob.date_of_birth);
        assert_eq!(updated.enrollment_date, bob.enrollment_date);
        assert_eq!(updated.status, bob.status);
        assert_eq!(updated.parent_id, Some(parent.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_student_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_student(&db, Uuid::new_v4(), student_input("Ghost", "Grade 1-A")).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_student() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Alice", "Grade 3-A").await?;

        delete_student(&db, student.id).await?;
        assert!(get_student_by_id(&db, student.id).await?.is_none());

        let again = delete_student(&db, student.id).await;
        assert!(matches!(again.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_student_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Alice", "Grade 3-A").await?;

        let found = get_student_by_name(&db, "ALICE").await?;
        assert_eq!(found.map(|s| s.id), Some(student.id));
        assert!(get_student_by_name(&db, "Alicia").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_student_details_expands_relations() -> Result<()> {
        let (db, parent, students) = setup_with_family().await?;
        let teacher = create_test_teacher(&db, "Mr. Cruz", "T-001").await?;
        crate::core::teacher::assign_teacher(&db, students[0].id, teacher.id).await?;

        let details = get_student_details(&db, students[0].id).await?.unwrap();
        assert_eq!(details.parent_name(), Some(parent.name.as_str()));
        assert_eq!(details.teacher_name(), Some("Mr. Cruz"));

        let bob = get_student_details(&db, students[1].id).await?.unwrap();
        assert_eq!(bob.teacher, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_student_details() -> Result<()> {
        let (db, parent, _students) = setup_with_family().await?;
        create_test_student(&db, "Carlo", "Grade 2-B").await?;

        let listing = list_student_details(&db).await?;
        let names: Vec<&str> = listing.iter().map(|d| d.student.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carlo"]);
        assert_eq!(listing[0].parent.as_ref().map(|p| p.id), Some(parent.id));
        assert_eq!(listing[2].parent, None);
        Ok(())
    }
}
