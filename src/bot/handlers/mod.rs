//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for parent, student, teacher, class, and payment method names
pub mod autocomplete;
