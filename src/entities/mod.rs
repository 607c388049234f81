//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod parent;
pub mod payment;
pub mod student;
pub mod teacher;

// Re-export specific types to avoid conflicts
pub use parent::{Column as ParentColumn, Entity as Parent, Model as ParentModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use student::{
    Column as StudentColumn, Entity as Student, Model as StudentModel, StudentStatus,
};
pub use teacher::{
    AssignedClasses, Column as TeacherColumn, Entity as Teacher, Model as TeacherModel,
    TeacherStatus,
};
