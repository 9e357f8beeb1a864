//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod cart;
pub mod course;
pub mod enrollment;
pub mod period;
pub mod user;

pub use cart::{CartRepository, CartView, CheckoutResult};
pub use course::CourseRepository;
pub use enrollment::{
    AdminEnrollInput, EnrollInput, EnrollmentDetails, EnrollmentFilter, EnrollmentRepository,
    PaymentInput, UpdateEnrollmentInput,
};
pub use period::{PeriodFilter, PeriodRepository, PeriodWithTeachers};
pub use user::{NewUser, UserRepository};

use sea_orm::{DbErr, SqlErr};

/// Returns true if the error is a unique index violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
