//! Payment entity - A single PTA contribution made by a parent.
//!
//! Every payment belongs to exactly one parent. The foreign key is `RESTRICT`, so a
//! parent with payments cannot be removed out from under them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Parent who made the payment
    pub parent_id: Uuid,
    /// Amount paid
    pub amount: f64,
    /// How the payment was made (e.g. `"cash"`, `"gcash"`)
    pub payment_method: String,
    /// Date the payment was made
    pub payment_date: Date,
    /// Opaque reference to a receipt
    pub receipt_reference: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the payment was recorded
    pub created_at: DateTimeUtc,
    /// When the payment was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one parent
    #[sea_orm(
        belongs_to = "super::parent::Entity",
        from = "Column::ParentId",
        to = "super::parent::Column::Id",
        on_delete = "Restrict"
    )]
    Parent,
}

impl Related<super::parent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
