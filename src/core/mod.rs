//! Core business logic - framework-agnostic operations over parents, students,
//! teachers and payments.
//!
//! Every function takes a database connection and returns [`crate::errors::Result`].
//! Multi-row effects (recording a payment, deleting a parent) run inside one database
//! transaction so a failure never leaves partial writes behind.

/// Student-parent linking and the available/linked student pools
pub mod link;
/// In-memory search, filter, sort and pagination for list views
pub mod listing;
/// Parent CRUD and relational expansion
pub mod parent;
/// Payment recording and the reconciliation rule
pub mod payment;
/// Aggregate statistics over students, parents and payments
pub mod stats;
/// Student CRUD and relational expansion
pub mod student;
/// Teacher CRUD and class/student assignment
pub mod teacher;
/// Shared input validation
pub mod validation;
