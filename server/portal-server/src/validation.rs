//! Request validation utilities for consistent validation across handlers
//!
//! Provides a `RequestValidation` trait and helper macros so every handler
//! validates locally, with the exact messages the browser client shows,
//! before any upstream call is made.

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// Implement this for every request type that carries user input. Handlers
/// call `validate()` as their first statement.
pub trait RequestValidation {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
///
/// # Usage
///
/// ```rust,ignore
/// validate_field!(self.email, !self.email.trim().is_empty(), "Email is required");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Macro for validating string length
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        let len = $field.len();
        validate_field!($field, len >= $min && len <= $max, $message);
    };
}

/// Macro for validating email format (basic check)
#[macro_export]
macro_rules! validate_email_field {
    ($field:expr, $message:expr) => {
        validate_field!(
            $field,
            ::session_core::validation::validate_email(&$field).is_ok(),
            $message
        );
    };
}
