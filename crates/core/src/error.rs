//! Register error model.

use thiserror::Error;

/// Result type used across the register.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// Register-level error.
///
/// Both kinds are caller errors: the transport layer maps each one to a
/// distinct response and nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// Input failed a structural rule (blank name, blank attribute key,
    /// path/body identifier mismatch).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced item does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl RegisterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
