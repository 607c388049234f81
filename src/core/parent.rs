//! Parent business logic - Handles all parent-related operations.
//!
//! Parents are created and edited from contact details only. The payment summary
//! columns are owned by [`crate::core::payment`] and are left untouched here.

use crate::{
    core::validation,
    entities::{Parent, Payment, Student, parent, payment, student},
    errors::{Error, Result},
};
use sea_orm::{
    PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Contact details submitted when creating or editing a parent.
#[derive(Debug, Clone, Default)]
pub struct ParentInput {
    /// Full name (required)
    pub name: String,
    /// Phone number (required)
    pub contact_number: String,
    /// Email address (required)
    pub email: String,
    /// Home address
    pub address: Option<String>,
}

impl From<&parent::Model> for ParentInput {
    fn from(parent: &parent::Model) -> Self {
        Self {
            name: parent.name.clone(),
            contact_number: parent.contact_number.clone(),
            email: parent.email.clone(),
            address: parent.address.clone(),
        }
    }
}

/// Validated, trimmed form of [`ParentInput`].
struct ValidParent {
    name: String,
    contact_number: String,
    email: String,
    address: Option<String>,
}

impl ParentInput {
    fn validate(&self) -> Result<ValidParent> {
        Ok(ValidParent {
            name: validation::required("name", &self.name)?,
            contact_number: validation::required("contact_number", &self.contact_number)?,
            email: validation::email("email", &self.email)?,
            address: validation::optional(self.address.as_deref()),
        })
    }
}

/// A parent together with every student linked to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentWithStudents {
    /// The parent record
    pub parent: parent::Model,
    /// Students whose `parent_id` references this parent, ordered by name
    pub students: Vec<student::Model>,
}

/// Creates a new parent with an unpaid payment summary.
pub async fn create_parent(db: &DatabaseConnection, input: ParentInput) -> Result<parent::Model> {
    let valid = input.validate()?;
    let now = chrono::Utc::now();

    let parent = parent::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(valid.name),
        contact_number: Set(valid.contact_number),
        email: Set(valid.email),
        address: Set(valid.address),
        payment_status: Set(false),
        payment_date: Set(None),
        payment_amount: Set(None),
        payment_method: Set(None),
        receipt_reference: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = parent.insert(db).await?;
    info!(parent_id = %result.id, "Created parent {}", result.name);
    Ok(result)
}

/// Finds a parent by its unique ID.
pub async fn get_parent_by_id(
    db: &DatabaseConnection,
    parent_id: Uuid,
) -> Result<Option<parent::Model>> {
    Parent::find_by_id(parent_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a parent by name, ignoring case and surrounding whitespace.
///
/// Names need not be unique. When several parents share a name the earliest
/// registered wins, following [`get_all_parents`] order.
pub async fn get_parent_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<parent::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(get_all_parents(db)
        .await?
        .into_iter()
        .find(|p| p.name.to_lowercase() == wanted))
}

/// Retrieves all parents ordered alphabetically by name, then by registration time.
pub async fn get_all_parents(db: &DatabaseConnection) -> Result<Vec<parent::Model>> {
    Parent::find()
        .order_by_asc(parent::Column::Name)
        .order_by_asc(parent::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a parent's contact details.
///
/// The derived payment columns keep their current values.
pub async fn update_parent(
    db: &DatabaseConnection,
    parent_id: Uuid,
    input: ParentInput,
) -> Result<parent::Model> {
    let valid = input.validate()?;

    let mut parent: parent::ActiveModel = Parent::find_by_id(parent_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Parent", parent_id))?
        .into();

    parent.name = Set(valid.name);
    parent.contact_number = Set(valid.contact_number);
    parent.email = Set(valid.email);
    parent.address = Set(valid.address);
    parent.updated_at = Set(chrono::Utc::now());

    parent.update(db).await.map_err(Into::into)
}

/// Deletes a parent, unlinking its students first.
///
/// A parent with recorded payments is kept: [`Error::ParentHasPayments`] is returned
/// and nothing changes.
pub async fn delete_parent(db: &DatabaseConnection, parent_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let parent = Parent::find_by_id(parent_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Parent", parent_id))?;

    let payment_count = Payment::find()
        .filter(payment::Column::ParentId.eq(parent_id))
        .count(&txn)
        .await?;
    if payment_count > 0 {
        warn!(%parent_id, payment_count, "Refusing to delete parent with payments");
        return Err(Error::ParentHasPayments {
            parent_id: parent_id.to_string(),
            count: payment_count,
        });
    }

    let unlinked = Student::update_many()
        .col_expr(student::Column::ParentId, Expr::value(Option::<Uuid>::None))
        .col_expr(student::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(student::Column::ParentId.eq(parent_id))
        .exec(&txn)
        .await?;

    parent.delete(&txn).await?;
    txn.commit().await?;

    info!(
        %parent_id,
        unlinked_students = unlinked.rows_affected,
        "Deleted parent"
    );
    Ok(())
}

/// Fetches a parent together with its linked students.
pub async fn get_parent_with_students(
    db: &DatabaseConnection,
    parent_id: Uuid,
) -> Result<Option<ParentWithStudents>> {
    let Some(parent) = get_parent_by_id(db, parent_id).await? else {
        return Ok(None);
    };
    let students = parent
        .find_related(Student)
        .order_by_asc(student::Column::Name)
        .all(db)
        .await?;
    Ok(Some(ParentWithStudents { parent, students }))
}

/// Fetches every parent together with its linked students, ordered by parent name.
pub async fn get_all_parents_with_students(
    db: &DatabaseConnection,
) -> Result<Vec<ParentWithStudents>> {
    let parents = get_all_parents(db).await?;
    let mut by_parent: HashMap<Uuid, Vec<student::Model>> = HashMap::new();
    for student in Student::find()
        .filter(student::Column::ParentId.is_not_null())
        .order_by_asc(student::Column::Name)
        .all(db)
        .await?
    {
        if let Some(parent_id) = student.parent_id {
            by_parent.entry(parent_id).or_default().push(student);
        }
    }

    Ok(parents
        .into_iter()
        .map(|parent| {
            let students = by_parent.remove(&parent.id).unwrap_or_default();
            ParentWithStudents { parent, students }
        })
        .collect())
}
