//! Enrollment rules.
//!
//! Every enrollment, whether created directly, by an administrator or from a
//! cart checkout, passes through the checks in [`EnrollmentService`] before
//! the repository admits a seat and inserts the row.
//!
//! # Modules
//!
//! - `types` - Enrollment status, payment methods, documents
//! - `error` - Enrollment-specific error types
//! - `pricing` - Discounts and payment arithmetic
//! - `service` - Eligibility checks and status transitions

pub mod error;
pub mod pricing;
pub mod service;
pub mod types;

#[cfg(test)]
mod pricing_props;

pub use error::EnrollmentError;
pub use pricing::{MAX_AMOUNT, PaymentState, discounted_price};
pub use service::{ADMIN_ENROLL_NOTE, AdminEnrollTerms, EnrollmentService};
pub use types::{DocumentKind, EnrollmentDocument, EnrollmentStatus, PaymentMethod};
