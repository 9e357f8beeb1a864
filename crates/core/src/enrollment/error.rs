//! Enrollment error types.
//!
//! Covers direct enrollment, administrator enrollment, payments and the
//! cart, since checkout funnels into the same creation path.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AccessDenied;
use crate::catalog::PeriodStatus;
use crate::enrollment::types::EnrollmentStatus;

/// Errors that can occur while enrolling students or handling carts.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Student not found.
    #[error("Student {0} not found")]
    StudentNotFound(Uuid),

    /// Period not found.
    #[error("Period {0} not found")]
    PeriodNotFound(Uuid),

    /// Course not found.
    #[error("Course {0} not found")]
    CourseNotFound(Uuid),

    /// Enrollment not found.
    #[error("Enrollment {0} not found")]
    EnrollmentNotFound(Uuid),

    /// The student has no cart yet.
    #[error("Cart not found")]
    CartNotFound,

    /// No such item in the student's cart.
    #[error("Cart item {0} not found")]
    CartItemNotFound(Uuid),

    /// The acting user does not have the role the operation needs.
    #[error("{0}")]
    InvalidRole(String),

    /// The period is not open for enrollment in its current state.
    #[error("Period {period} is not available for enrollment (status: {status})")]
    NotAvailable {
        /// Period code.
        period: String,
        /// Current status.
        status: PeriodStatus,
    },

    /// No seats left.
    #[error("No available seats in period {period}")]
    CapacityExceeded {
        /// Period code.
        period: String,
    },

    /// The student is already enrolled in the period.
    #[error("Student is already enrolled in this period")]
    DuplicateEnrollment,

    /// Checkout on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The (course, period) pair is already in the cart.
    #[error("Item already in cart")]
    ItemAlreadyInCart,

    /// The period is an offering of a different course.
    #[error("Period {period} does not belong to course {course}")]
    PeriodCourseMismatch {
        /// Period code.
        period: String,
        /// Requested course ID.
        course: Uuid,
    },

    /// Discount outside 0-100.
    #[error("Discount must be between 0 and 100, got {0}")]
    InvalidDiscount(Decimal),

    /// Payment amount not positive, or a negative amount paid.
    #[error("Invalid amount {0}")]
    InvalidAmount(Decimal),

    /// Enrollment status change not allowed.
    #[error("Invalid enrollment status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: EnrollmentStatus,
        /// The requested status.
        to: EnrollmentStatus,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<AccessDenied> for EnrollmentError {
    fn from(err: AccessDenied) -> Self {
        Self::InvalidRole(err.to_string())
    }
}

impl EnrollmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StudentNotFound(_)
            | Self::PeriodNotFound(_)
            | Self::CourseNotFound(_)
            | Self::EnrollmentNotFound(_)
            | Self::CartNotFound
            | Self::CartItemNotFound(_) => 404,

            Self::InvalidRole(_) => 403,

            Self::NotAvailable { .. }
            | Self::CapacityExceeded { .. }
            | Self::DuplicateEnrollment
            | Self::EmptyCart
            | Self::ItemAlreadyInCart
            | Self::PeriodCourseMismatch { .. }
            | Self::InvalidDiscount(_)
            | Self::InvalidAmount(_)
            | Self::InvalidTransition { .. } => 400,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::EnrollmentNotFound(_) => "ENROLLMENT_NOT_FOUND",
            Self::CartNotFound => "CART_NOT_FOUND",
            Self::CartItemNotFound(_) => "CART_ITEM_NOT_FOUND",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::NotAvailable { .. } => "NOT_AVAILABLE",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::DuplicateEnrollment => "DUPLICATE_ENROLLMENT",
            Self::EmptyCart => "EMPTY_CART",
            Self::ItemAlreadyInCart => "ITEM_ALREADY_IN_CART",
            Self::PeriodCourseMismatch { .. } => "PERIOD_COURSE_MISMATCH",
            Self::InvalidDiscount(_) => "INVALID_DISCOUNT",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
