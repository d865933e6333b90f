//! Session errors.

use thiserror::Error;

/// Session error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// A login or register call is already in flight.
    #[error("another session operation is already pending")]
    OperationPending,

    /// Email already registered with this engine.
    #[error("email already registered: {0}")]
    EmailAlreadyRegistered(String),

    /// Email is not a plausible address.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// A registration field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// No user is logged in.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    /// Check if the caller supplied bad input, as opposed to a state conflict.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) | AuthError::InvalidField { .. }
        )
    }
}
