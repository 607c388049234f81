//! Teacher business logic - Handles teacher records and their class/student assignments.

use crate::{
    core::validation,
    entities::{AssignedClasses, Student, Teacher, TeacherStatus, student, teacher},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Details submitted when creating or editing a teacher.
#[derive(Debug, Clone)]
pub struct TeacherInput {
    /// Full name (required)
    pub name: String,
    /// School-issued employee number (required, unique)
    pub employee_id: String,
    /// Phone number (required)
    pub contact_number: String,
    /// Email address (required)
    pub email: String,
    /// Home address (required)
    pub address: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Date hired
    pub hire_date: NaiveDate,
    /// Department (required)
    pub department: String,
    /// Position (required)
    pub position: String,
    /// Classes handled; duplicates and blanks are dropped
    pub assigned_classes: Vec<String>,
    /// Employment status
    pub status: TeacherStatus,
    /// Monthly salary
    pub salary: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl From<&teacher::Model> for TeacherInput {
    fn from(teacher: &teacher::Model) -> Self {
        Self {
            name: teacher.name.clone(),
            employee_id: teacher.employee_id.clone(),
            contact_number: teacher.contact_number.clone(),
            email: teacher.email.clone(),
            address: teacher.address.clone(),
            date_of_birth: teacher.date_of_birth,
            hire_date: teacher.hire_date,
            department: teacher.department.clone(),
            position: teacher.position.clone(),
            assigned_classes: teacher.assigned_classes.0.clone(),
            status: teacher.status,
            salary: teacher.salary,
            notes: teacher.notes.clone(),
        }
    }
}

struct ValidTeacher {
    name: String,
    employee_id: String,
    contact_number: String,
    email: String,
    address: String,
    department: String,
    position: String,
    assigned_classes: AssignedClasses,
    salary: Option<f64>,
    notes: Option<String>,
}

impl TeacherInput {
    fn validate(&self) -> Result<ValidTeacher> {
        Ok(ValidTeacher {
            name: validation::required("name", &self.name)?,
            employee_id: validation::required("employee_id", &self.employee_id)?,
            contact_number: validation::required("contact_number", &self.contact_number)?,
            email: validation::email("email", &self.email)?,
            address: validation::required("address", &self.address)?,
            department: validation::required("department", &self.department)?,
            position: validation::required("position", &self.position)?,
            assigned_classes: AssignedClasses::new(&self.assigned_classes),
            salary: validation::optional_amount(self.salary)?,
            notes: validation::optional(self.notes.as_deref()),
        })
    }
}

/// A teacher together with the students assigned to them.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherWithStudents {
    /// The teacher record
    pub teacher: teacher::Model,
    /// Students whose `teacher_id` references this teacher, ordered by name
    pub students: Vec<student::Model>,
}

/// Fails with [`Error::DuplicateEmployeeId`] if another teacher uses `employee_id`.
async fn ensure_employee_id_free(
    db: &DatabaseConnection,
    employee_id: &str,
    except: Option<Uuid>,
) -> Result<()> {
    let existing = Teacher::find()
        .filter(teacher::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?;
    match existing {
        Some(t) if Some(t.id) != except => Err(Error::DuplicateEmployeeId {
            employee_id: employee_id.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Creates a new teacher.
pub async fn create_teacher(db: &DatabaseConnection, input: TeacherInput) -> Result<teacher::Model> {
    let valid = input.validate()?;
    ensure_employee_id_free(db, &valid.employee_id, None).await?;

    let now = chrono::Utc::now();
    let teacher = teacher::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(valid.name),
        employee_id: Set(valid.employee_id),
        contact_number: Set(valid.contact_number),
        email: Set(valid.email),
        address: Set(valid.address),
        date_of_birth: Set(input.date_of_birth),
        hire_date: Set(input.hire_date),
        department: Set(valid.department),
        position: Set(valid.position),
        assigned_classes: Set(valid.assigned_classes),
        status: Set(input.status),
        salary: Set(valid.salary),
        notes: Set(valid.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = teacher.insert(db).await?;
    info!(teacher_id = %result.id, "Created teacher {} ({})", result.name, result.employee_id);
    Ok(result)
}

/// Finds a teacher by its unique ID.
pub async fn get_teacher_by_id(
    db: &DatabaseConnection,
    teacher_id: Uuid,
) -> Result<Option<teacher::Model>> {
    Teacher::find_by_id(teacher_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a teacher by name or employee ID, ignoring case.
pub async fn get_teacher_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<teacher::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(get_all_teachers(db).await?.into_iter().find(|t| {
        t.name.to_lowercase() == wanted || t.employee_id.to_lowercase() == wanted
    }))
}

/// Retrieves all teachers ordered alphabetically by name.
pub async fn get_all_teachers(db: &DatabaseConnection) -> Result<Vec<teacher::Model>> {
    Teacher::find()
        .order_by_asc(teacher::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a teacher. The employee ID may change as long as it stays unique.
pub async fn update_teacher(
    db: &DatabaseConnection,
    teacher_id: Uuid,
    input: TeacherInput,
) -> Result<teacher::Model> {
    let valid = input.validate()?;

    let mut teacher: teacher::ActiveModel = Teacher::find_by_id(teacher_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher_id))?
        .into();
    ensure_employee_id_free(db, &valid.employee_id, Some(teacher_id)).await?;

    teacher.name = Set(valid.name);
    teacher.employee_id = Set(valid.employee_id);
    teacher.contact_number = Set(valid.contact_number);
    teacher.email = Set(valid.email);
    teacher.address = Set(valid.address);
    teacher.date_of_birth = Set(input.date_of_birth);
    teacher.hire_date = Set(input.hire_date);
    teacher.department = Set(valid.department);
    teacher.position = Set(valid.position);
    teacher.assigned_classes = Set(valid.assigned_classes);
    teacher.status = Set(input.status);
    teacher.salary = Set(valid.salary);
    teacher.notes = Set(valid.notes);
    teacher.updated_at = Set(chrono::Utc::now());

    teacher.update(db).await.map_err(Into::into)
}

/// Deletes a teacher after clearing the teacher reference on their students.
pub async fn delete_teacher(db: &DatabaseConnection, teacher_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let teacher = Teacher::find_by_id(teacher_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher_id))?;

    Student::update_many()
        .col_expr(student::Column::TeacherId, Expr::value(Option::<Uuid>::None))
        .col_expr(student::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(student::Column::TeacherId.eq(teacher_id))
        .exec(&txn)
        .await?;

    teacher.delete(&txn).await?;
    txn.commit().await?;

    info!(%teacher_id, "Deleted teacher");
    Ok(())
}

/// Fetches a teacher together with their assigned students.
pub async fn get_teacher_with_students(
    db: &DatabaseConnection,
    teacher_id: Uuid,
) -> Result<Option<TeacherWithStudents>> {
    let Some(teacher) = get_teacher_by_id(db, teacher_id).await? else {
        return Ok(None);
    };
    let students = teacher
        .find_related(Student)
        .order_by_asc(student::Column::Name)
        .all(db)
        .await?;
    Ok(Some(TeacherWithStudents { teacher, students }))
}

/// Assigns a student to a teacher, replacing any previous assignment.
pub async fn assign_teacher(
    db: &DatabaseConnection,
    student_id: Uuid,
    teacher_id: Uuid,
) -> Result<student::Model> {
    Teacher::find_by_id(teacher_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher_id))?;

    let mut student: student::ActiveModel = Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Student", student_id))?
        .into();

    student.teacher_id = Set(Some(teacher_id));
    student.updated_at = Set(chrono::Utc::now());
    student.update(db).await.map_err(Into::into)
}

/// Clears a student's teacher assignment.
pub async fn unassign_teacher(db: &DatabaseConnection, student_id: Uuid) -> Result<student::Model> {
    let mut student: student::ActiveModel = Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Student", student_id))?
        .into();

    student.teacher_id = Set(None);
    student.updated_at = Set(chrono::Utc::now());
    student.update(db).await.map_err(Into::into)
}
