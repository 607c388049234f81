//! Input validation shared by the CRUD operations.
//!
//! All checks run before any database call so a rejected form never costs a round trip.

use crate::{
    entities::{StudentStatus, TeacherStatus},
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Trims a required text field, failing when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field, mapping blank input to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Validates a required email address.
pub fn email(field: &'static str, value: &str) -> Result<String> {
    let email = required(field, value)?;
    check_email(field, &email)?;
    Ok(email)
}

/// Validates an optional email address; blank input becomes `None`.
pub fn optional_email(field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    let Some(email) = optional(value) else {
        return Ok(None);
    };
    check_email(field, &email)?;
    Ok(Some(email))
}

fn check_email(field: &'static str, email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::validation(field, format!("'{email}' is not an email address"))),
    }
}

/// Validates a payment amount: finite and strictly positive.
pub fn payment_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Validates an optional non-negative amount such as a salary.
pub fn optional_amount(amount: Option<f64>) -> Result<Option<f64>> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(Error::InvalidAmount { amount: value })
        }
        other => Ok(other),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::validation(field, format!("'{value}' is not a YYYY-MM-DD date")))
}

/// Splits a comma-separated class list, dropping blank entries.
#[must_use]
pub fn class_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|class| optional(Some(class)))
        .collect()
}

/// Parses a student status name, ignoring case.
pub fn student_status(value: &str) -> Result<StudentStatus> {
    match value.trim().to_lowercase().as_str() {
        "active" => Ok(StudentStatus::Active),
        "inactive" => Ok(StudentStatus::Inactive),
        "transferred" => Ok(StudentStatus::Transferred),
        other => Err(Error::validation(
            "status",
            format!("'{other}' is not one of active, inactive, transferred"),
        )),
    }
}

/// Parses a teacher status name, ignoring case. Accepts "on leave" for `on_leave`.
pub fn teacher_status(value: &str) -> Result<TeacherStatus> {
    match value.trim().to_lowercase().replace(' ', "_").as_str() {
        "active" => Ok(TeacherStatus::Active),
        "inactive" => Ok(TeacherStatus::Inactive),
        "on_leave" => Ok(TeacherStatus::OnLeave),
        other => Err(Error::validation(
            "status",
            format!("'{other}' is not one of active, inactive, on_leave"),
        )),
    }
}

/// Parses a payment tab name: `paid` gives `true`, `unpaid` gives `false`.
pub fn payment_status(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "paid" => Ok(true),
        "unpaid" => Ok(false),
        other => Err(Error::validation(
            "status",
            format!("'{other}' is not one of paid, unpaid"),
        )),
    }
}
