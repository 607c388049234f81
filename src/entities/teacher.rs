//! Teacher entity - A member of staff who may be assigned classes and students.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment status of a teacher
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    /// Currently teaching
    #[sea_orm(string_value = "active")]
    Active,
    /// No longer teaching
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Temporarily away
    #[sea_orm(string_value = "on_leave")]
    OnLeave,
}

/// Set of class names a teacher handles, stored as a JSON array.
///
/// Always kept sorted and free of duplicates and blank entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AssignedClasses(pub Vec<String>);

impl AssignedClasses {
    /// Builds a normalized set from arbitrary class names.
    #[must_use]
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = classes
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    /// Whether the teacher handles the given class.
    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.0.iter().any(|c| c == class_name)
    }
}

/// Teacher database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name of the teacher
    pub name: String,
    /// School-issued employee number, unique across teachers
    #[sea_orm(unique)]
    pub employee_id: String,
    /// Phone number
    pub contact_number: String,
    /// Email address
    pub email: String,
    /// Home address
    pub address: String,
    /// Date of birth
    pub date_of_birth: Date,
    /// Date the teacher was hired
    pub hire_date: Date,
    /// Department (e.g. "Mathematics")
    pub department: String,
    /// Position (e.g. "Adviser")
    pub position: String,
    /// Classes this teacher handles
    #[sea_orm(column_type = "Json")]
    pub assigned_classes: AssignedClasses,
    /// Employment status
    pub status: TeacherStatus,
    /// Monthly salary, if recorded
    pub salary: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the teacher was created
    pub created_at: DateTimeUtc,
    /// When the teacher was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Teacher and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One teacher has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_assigned_classes_normalized() {
        let classes = AssignedClasses::new(["Grade 2-B", " Grade 1-A ", "", "Grade 2-B"]);
        assert_eq!(classes.0, vec!["Grade 1-A".to_string(), "Grade 2-B".to_string()]);
        assert!(classes.contains("Grade 1-A"));
        assert!(!classes.contains("Grade 3-C"));
    }

    #[test]
    fn test_assigned_classes_json_shape() {
        let classes = AssignedClasses::new(["Grade 1-A", "Grade 2-B"]);
        let json = serde_json::to_value(&classes).unwrap();
        assert_eq!(json, serde_json::json!(["Grade 1-A", "Grade 2-B"]));
    }
}
