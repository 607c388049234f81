//! Student entity - A child enrolled at the school.
//!
//! A student optionally belongs to one parent and one teacher. Both foreign keys are
//! `SET NULL` so removing either side unlinks the student instead of leaving a
//! dangling reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment status of a student
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Currently enrolled
    #[sea_orm(string_value = "active")]
    Active,
    /// Enrolled but not attending
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Moved to another school
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name of the student
    pub name: String,
    /// Class or section (e.g. "Grade 1-A"), used for class summaries
    pub class_name: String,
    /// Grade level (e.g. "Grade 1")
    pub grade_level: String,
    /// Date of birth
    pub date_of_birth: Date,
    /// Phone number
    pub contact_number: String,
    /// Email address
    pub email: Option<String>,
    /// Home address
    pub address: String,
    /// Date the student enrolled
    pub enrollment_date: Date,
    /// Enrollment status
    pub status: StudentStatus,
    /// Whether the PTA contribution for this student has been paid
    pub payment_status: bool,
    /// When the contribution was paid
    pub payment_date: Option<Date>,
    /// Parent this student is linked to, if any
    pub parent_id: Option<Uuid>,
    /// Homeroom teacher, if any
    pub teacher_id: Option<Uuid>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the student was created
    pub created_at: DateTimeUtc,
    /// When the student was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student optionally belongs to one parent
    #[sea_orm(
        belongs_to = "super::parent::Entity",
        from = "Column::ParentId",
        to = "super::parent::Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    /// Each student optionally belongs to one teacher
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "SetNull"
    )]
    Teacher,
}

impl Related<super::parent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
