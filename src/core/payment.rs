//! Payment business logic - Records PTA contributions and keeps payment status consistent.
//!
//! Recording a payment is the one multi-table write in the system. Inside a single
//! database transaction it:
//!
//! 1. inserts the payment row,
//! 2. recomputes the parent's payment summary from its payment rows,
//! 3. marks every student currently linked to the parent as paid on the summary date.
//!
//! The parent summary always reflects the payment with the latest date, whichever
//! operation last touched it. If the parent does not exist nothing is written. Deleting
//! a payment recomputes the summary from the payments that remain; student flags are
//! not reverted.

use crate::{
    core::validation,
    entities::{Parent, Payment, Student, parent, payment, student},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};

/// A payment as submitted from the payment form.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Parent making the payment
    pub parent_id: Uuid,
    /// Amount paid; must be finite and greater than zero
    pub amount: f64,
    /// How the payment was made (required)
    pub payment_method: String,
    /// Date the payment was made
    pub payment_date: NaiveDate,
    /// Opaque reference to a receipt
    pub receipt_reference: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Everything a recorded payment touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// The newly inserted payment row
    pub payment: payment::Model,
    /// The parent after its payment summary was recomputed
    pub parent: parent::Model,
    /// Students linked to the parent, all now marked paid on the summary date
    pub students_marked_paid: Vec<student::Model>,
}

/// A payment together with the name of the parent who made it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentWithParent {
    /// The payment row
    pub payment: payment::Model,
    /// Parent name, absent only if the parent row is missing
    pub parent_name: Option<String>,
}

/// Records a payment and propagates the paid status to the parent and linked students.
///
/// Validation happens before touching the database. All writes share one transaction, so
/// an unknown parent (or any database failure) leaves no partial state behind.
pub async fn record_payment(db: &DatabaseConnection, input: PaymentInput) -> Result<PaymentReceipt> {
    let amount = validation::payment_amount(input.amount)?;
    let payment_method = validation::required("payment_method", &input.payment_method)?;
    let receipt_reference = validation::optional(input.receipt_reference.as_deref());
    let notes = validation::optional(input.notes.as_deref());

    let txn = db.begin().await?;

    let parent = Parent::find_by_id(input.parent_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Parent", input.parent_id))?;

    let now = chrono::Utc::now();
    let payment = payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        parent_id: Set(parent.id),
        amount: Set(amount),
        payment_method: Set(payment_method),
        payment_date: Set(input.payment_date),
        receipt_reference: Set(receipt_reference),
        notes: Set(notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let parent = recompute_parent_summary(&txn, parent.id).await?;
    let paid_on = parent.payment_date.unwrap_or(payment.payment_date);
    let students_marked_paid = mark_linked_students_paid(&txn, parent.id, paid_on).await?;

    txn.commit().await?;

    info!(
        payment_id = %payment.id,
        parent_id = %parent.id,
        amount,
        students = students_marked_paid.len(),
        "Recorded payment"
    );

    Ok(PaymentReceipt {
        payment,
        parent,
        students_marked_paid,
    })
}

/// Marks every student linked to `parent_id` as paid on `payment_date`.
///
/// Returns the updated students ordered by name.
pub async fn mark_linked_students_paid<C>(
    db: &C,
    parent_id: Uuid,
    payment_date: NaiveDate,
) -> Result<Vec<student::Model>>
where
    C: ConnectionTrait,
{
    let updated = Student::update_many()
        .col_expr(student::Column::PaymentStatus, Expr::value(true))
        .col_expr(student::Column::PaymentDate, Expr::value(Some(payment_date)))
        .col_expr(student::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(student::Column::ParentId.eq(parent_id))
        .exec(db)
        .await?;
    debug!(%parent_id, rows = updated.rows_affected, "Marked linked students paid");

    Student::find()
        .filter(student::Column::ParentId.eq(parent_id))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Recomputes a parent's payment summary from its remaining payment rows.
///
/// The latest payment by date (newest recording first on ties) supplies the summary.
/// With no payments left the parent becomes unpaid and the summary is cleared.
pub async fn recompute_parent_summary<C>(db: &C, parent_id: Uuid) -> Result<parent::Model>
where
    C: ConnectionTrait,
{
    let parent = Parent::find_by_id(parent_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Parent", parent_id))?;

    let latest = Payment::find()
        .filter(payment::Column::ParentId.eq(parent_id))
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::CreatedAt)
        .limit(1)
        .one(db)
        .await?;

    let mut parent: parent::ActiveModel = parent.into();
    match latest {
        Some(p) => {
            parent.payment_status = Set(true);
            parent.payment_date = Set(Some(p.payment_date));
            parent.payment_amount = Set(Some(p.amount));
            parent.payment_method = Set(Some(p.payment_method));
            parent.receipt_reference = Set(p.receipt_reference);
        }
        None => {
            parent.payment_status = Set(false);
            parent.payment_date = Set(None);
            parent.payment_amount = Set(None);
            parent.payment_method = Set(None);
            parent.receipt_reference = Set(None);
        }
    }
    parent.updated_at = Set(chrono::Utc::now());
    parent.update(db).await.map_err(Into::into)
}

/// Deletes a payment and recomputes its parent's payment summary.
///
/// Returns the parent as it stands after the recomputation.
pub async fn delete_payment(db: &DatabaseConnection, payment_id: Uuid) -> Result<parent::Model> {
    let txn = db.begin().await?;

    let payment = Payment::find_by_id(payment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Payment", payment_id))?;
    let parent_id = payment.parent_id;

    payment.delete(&txn).await?;
    let parent = recompute_parent_summary(&txn, parent_id).await?;

    txn.commit().await?;
    info!(%payment_id, %parent_id, paid = parent.payment_status, "Deleted payment");
    Ok(parent)
}

/// Finds a payment by its unique ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: Uuid,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a parent's payments, newest first.
pub async fn get_payments_for_parent(
    db: &DatabaseConnection,
    parent_id: Uuid,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::ParentId.eq(parent_id))
        .order_by_desc(payment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every payment with its parent's name, newest first.
pub async fn list_payments(db: &DatabaseConnection) -> Result<Vec<PaymentWithParent>> {
    fetch_payments_with_parent(db, None).await
}

/// Retrieves the `limit` most recently recorded payments with parent names.
pub async fn recent_payments(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<PaymentWithParent>> {
    fetch_payments_with_parent(db, Some(limit)).await
}

async fn fetch_payments_with_parent(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> Result<Vec<PaymentWithParent>> {
    let mut query = Payment::find()
        .find_also_related(Parent)
        .order_by_desc(payment::Column::CreatedAt);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows = query.all(db).await?;
    Ok(rows
        .into_iter()
        .map(|(payment, parent)| PaymentWithParent {
            payment,
            parent_name: parent.map(|p| p.name),
        })
        .collect())
}
