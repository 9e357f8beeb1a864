//! Catalog error types.

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::types::PeriodStatus;

/// Errors raised while managing courses and periods.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Course not found.
    #[error("Course {0} not found")]
    CourseNotFound(Uuid),

    /// Period not found.
    #[error("Period {0} not found")]
    PeriodNotFound(Uuid),

    /// Another course or period already uses this code.
    #[error("Code {0} is already in use")]
    DuplicateCode(String),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Period status change not allowed.
    #[error("Invalid period status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: PeriodStatus,
        /// The requested status.
        to: PeriodStatus,
    },

    /// Capacity cannot drop below the seats already taken.
    #[error("Capacity {capacity} is below the {occupied} occupied seats")]
    CapacityBelowOccupied {
        /// Requested capacity.
        capacity: i32,
        /// Seats currently occupied.
        occupied: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CatalogError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::CourseNotFound(_) | Self::PeriodNotFound(_) => 404,
            Self::DuplicateCode(_)
            | Self::Validation(_)
            | Self::InvalidTransition { .. }
            | Self::CapacityBelowOccupied { .. } => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CapacityBelowOccupied { .. } => "CAPACITY_BELOW_OCCUPIED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
