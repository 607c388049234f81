//! Shared test utilities for the PTA tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        parent::{self, ParentInput},
        payment::PaymentInput,
        student::{self, StudentInput},
        teacher::{self, TeacherInput},
    },
    entities::{self, StudentStatus, TeacherStatus},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, prelude::Uuid};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The date every test record uses: 2024-01-10.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

/// Creates a test parent named `name`.
///
/// # Defaults
/// * `contact_number`: "0917 555 0100"
/// * `email`: derived from the name, e.g. "jane.doe@example.com"
/// * `address`: None
pub async fn create_test_parent(db: &DatabaseConnection, name: &str) -> Result<entities::ParentModel> {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    parent::create_parent(
        db,
        ParentInput {
            name: name.to_string(),
            contact_number: "0917 555 0100".to_string(),
            email,
            address: None,
        },
    )
    .await
}

/// Student profile with valid defaults, active and enrolled on [`test_date`].
#[must_use]
pub fn student_input(name: &str, class_name: &str) -> StudentInput {
    StudentInput {
        name: name.to_string(),
        class_name: class_name.to_string(),
        grade_level: "Grade 3".to_string(),
        date_of_birth: test_date(),
        contact_number: "0917 555 0200".to_string(),
        email: None,
        address: "12 Mabini St.".to_string(),
        enrollment_date: test_date(),
        status: StudentStatus::Active,
        notes: None,
    }
}

/// Creates an unlinked test student with no teacher.
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
    class_name: &str,
) -> Result<entities::StudentModel> {
    student::create_student(db, student_input(name, class_name), None, None).await
}

/// Teacher details with valid defaults: active, no classes, no salary.
#[must_use]
pub fn teacher_input(name: &str, employee_id: &str) -> TeacherInput {
    TeacherInput {
        name: name.to_string(),
        employee_id: employee_id.to_string(),
        contact_number: "0917 555 0300".to_string(),
        email: format!("{}@school.example.com", employee_id.to_lowercase()),
        address: "1 School Rd.".to_string(),
        date_of_birth: test_date(),
        hire_date: test_date(),
        department: "Science".to_string(),
        position: "Adviser".to_string(),
        assigned_classes: Vec::new(),
        status: TeacherStatus::Active,
        salary: None,
        notes: None,
    }
}

/// Creates a test teacher from [`teacher_input`].
pub async fn create_test_teacher(
    db: &DatabaseConnection,
    name: &str,
    employee_id: &str,
) -> Result<entities::TeacherModel> {
    teacher::create_teacher(db, teacher_input(name, employee_id)).await
}

/// A cash payment on [`test_date`] with no receipt or notes.
#[must_use]
pub fn test_payment(parent_id: Uuid, amount: f64) -> PaymentInput {
    PaymentInput {
        parent_id,
        amount,
        payment_method: "cash".to_string(),
        payment_date: test_date(),
        receipt_reference: None,
        notes: None,
    }
}

/// Sets up a database with one unpaid family.
/// Returns (db, "Jane Doe", [Alice in "Grade 3-A", Bob in "Grade 5-B"]).
pub async fn setup_with_family() -> Result<(
    DatabaseConnection,
    entities::ParentModel,
    Vec<entities::StudentModel>,
)> {
    let db = setup_test_db().await?;
    let parent = create_test_parent(&db, "Jane Doe").await?;
    let alice =
        student::create_student(&db, student_input("Alice", "Grade 3-A"), Some(parent.id), None)
            .await?;
    let bob = student::create_student(&db, student_input("Bob", "Grade 5-B"), Some(parent.id), None)
        .await?;
    Ok((db, parent, vec![alice, bob]))
}
