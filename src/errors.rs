//! Unified error type for the PTA tracker.
//!
//! Every core operation returns [`Result`]. Validation failures are raised before
//! any database round trip; database failures are wrapped as [`Error::Database`].

use thiserror::Error;

/// All errors the tracker can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// The referenced record does not exist (possibly deleted by another session)
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record ("Parent", "Student", ...)
        entity: &'static str,
        /// The identifier or name that was looked up
        id: String,
    },

    /// Amount is zero, negative, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The student already belongs to a different parent
    #[error("Student {student_id} is already linked to parent {parent_id}")]
    AlreadyLinked {
        /// Student being linked
        student_id: String,
        /// Parent the student currently belongs to
        parent_id: String,
    },

    /// Another teacher already uses this employee ID
    #[error("Employee ID '{employee_id}' is already in use")]
    DuplicateEmployeeId {
        /// The conflicting employee ID
        employee_id: String,
    },

    /// Parent cannot be deleted while payment records reference it
    #[error("Parent {parent_id} has {count} recorded payment(s) and cannot be deleted")]
    ParentHasPayments {
        /// Parent whose deletion was refused
        parent_id: String,
        /// Number of payments still referencing the parent
        count: u64,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Any failure reported by the data store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Failed to build a reply message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
