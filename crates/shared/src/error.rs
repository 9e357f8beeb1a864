//! Application-wide error types.
//!
//! Covers account and request-level failures. Catalog and enrollment rules
//! carry their own error enums in `academy-core`.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but may not log in.
    #[error("This account has been disabled")]
    AccountDisabled,

    /// Email or document number already belongs to an account.
    #[error("{0} already registered")]
    AlreadyRegistered(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::AccountDisabled => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::AlreadyRegistered(_) => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) | Self::AlreadyRegistered(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the message safe to show to API clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) => "An error occurred".to_string(),
            other => other.to_string(),
        }
    }
}
