//! Error types for the Hekim system.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::access::{PermissionLevel, Role};

/// A single rejected field in a submission.
///
/// Validation never stops at the first problem: every violation found for a
/// submission is returned together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why an authenticated caller was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The caller's derived permission level is below the endpoint's minimum.
    InsufficientPermission {
        required: PermissionLevel,
        current: PermissionLevel,
    },
    /// The endpoint requires a specific role.
    RoleRequired { required: Role, current: Role },
    /// The target row belongs to another hospital.
    CrossTenant,
    /// The operation is not allowed on the caller's own account.
    SelfTarget,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::InsufficientPermission { required, current } => write!(
                f,
                "insufficient permission (required: {}, current: {})",
                required.name(),
                current.name()
            ),
            Denial::RoleRequired { required, current } => write!(
                f,
                "role '{}' required (current: '{}')",
                required.as_str(),
                current.as_str()
            ),
            Denial::CrossTenant => f.write_str("resource belongs to another hospital"),
            Denial::SelfTarget => f.write_str("operation not allowed on own account"),
        }
    }
}

/// Password-reset outcomes that are reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetFailure {
    /// No user is registered with the given phone number.
    UnknownRecipient,
    /// No code is outstanding for the phone (never requested, expired or used).
    CodeExpiredOrMissing,
    CodeMismatch,
    PasswordMismatch,
}

impl fmt::Display for ResetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ResetFailure::UnknownRecipient => "phone number is not registered",
            ResetFailure::CodeExpiredOrMissing => "code expired or not found",
            ResetFailure::CodeMismatch => "code does not match",
            ResetFailure::PasswordMismatch => "passwords do not match",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum HekimError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness constraint was rejected by the store itself, after the
    /// advisory pre-check passed.
    #[error("Conflict on {entity}: {constraint}")]
    Conflict { entity: String, constraint: String },

    /// Missing, malformed, invalid or expired credential. The reason is for
    /// server-side logs only.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Forbidden: {0}")]
    Forbidden(Denial),

    #[error("Validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Password reset failed: {0}")]
    PasswordReset(ResetFailure),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HekimError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        HekimError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True for errors whose detail must not reach clients.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            HekimError::Database(_)
                | HekimError::Unavailable(_)
                | HekimError::Crypto(_)
                | HekimError::Internal(_)
        )
    }
}

pub type HekimResult<T> = Result<T, HekimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_message_names_both_levels() {
        let denial = Denial::InsufficientPermission {
            required: PermissionLevel::Admin,
            current: PermissionLevel::Read,
        };
        let msg = denial.to_string();
        assert!(msg.contains("yönetici"));
        assert!(msg.contains("okuma"));
    }

    #[test]
    fn validation_error_counts_violations() {
        let err = HekimError::Validation(vec![
            FieldViolation::new("tax_id", "taken"),
            FieldViolation::new("hospital_email", "taken"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 violation(s)");
    }

    #[test]
    fn internal_errors_are_flagged() {
        assert!(HekimError::Database("boom".into()).is_internal());
        assert!(!HekimError::not_found("staff", "x").is_internal());
    }
}
