//! Parent entity - A guardian who is financially responsible for one or more students.
//!
//! The `payment_*` columns are a cached summary of the parent's most recent payment.
//! They are maintained by `core::payment` and are never written by parent updates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parent database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parents")]
pub struct Model {
    /// Unique identifier for the parent
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name of the parent or guardian
    pub name: String,
    /// Phone number
    pub contact_number: String,
    /// Email address
    pub email: String,
    /// Home address
    pub address: Option<String>,
    /// Whether at least one payment has been recorded for this parent
    pub payment_status: bool,
    /// Date of the latest recorded payment
    pub payment_date: Option<Date>,
    /// Amount of the latest recorded payment
    pub payment_amount: Option<f64>,
    /// Method of the latest recorded payment (e.g. `"cash"`)
    pub payment_method: Option<String>,
    /// Opaque reference to the receipt of the latest payment
    pub receipt_reference: Option<String>,
    /// When the parent was created
    pub created_at: DateTimeUtc,
    /// When the parent was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Parent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One parent has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
    /// One parent has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
