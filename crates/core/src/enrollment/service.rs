//! Enrollment eligibility checks.
//!
//! These are the pure halves of the repository operations: the repository
//! loads the rows, calls into here in a fixed order, and only then touches
//! the seat counter. The checks are repeated atomically by the database, so
//! a request that passes here can still lose the last seat to a concurrent
//! one.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{Permission, UserRole};
use crate::catalog::{PeriodStatus, SeatLedger};
use crate::enrollment::error::EnrollmentError;
use crate::enrollment::pricing::{MAX_AMOUNT, discounted_price};
use crate::enrollment::types::{EnrollmentStatus, PaymentMethod};

/// Default notes on enrollments created by an administrator.
pub const ADMIN_ENROLL_NOTE: &str = "Enrolled by administrator";

/// Resolved terms of an administrator enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEnrollTerms {
    /// Amount recorded as paid: the discounted list price.
    pub amount_paid: Decimal,
    /// Discount percentage applied.
    pub discount: Decimal,
    /// Payment method, `cash` unless given.
    pub payment_method: PaymentMethod,
    /// Notes, [`ADMIN_ENROLL_NOTE`] unless given.
    pub notes: String,
}

/// Stateless enrollment rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollmentService;

impl EnrollmentService {
    /// The target user must exist and be a student.
    ///
    /// `role` is `None` when no user with `student_id` exists.
    pub fn check_student(student_id: Uuid, role: Option<UserRole>) -> Result<(), EnrollmentError> {
        match role {
            None => Err(EnrollmentError::StudentNotFound(student_id)),
            Some(UserRole::Student) => Ok(()),
            Some(other) => Err(EnrollmentError::InvalidRole(format!(
                "User {student_id} has role {other}, only students can be enrolled"
            ))),
        }
    }

    /// The acting user must be allowed to enroll others.
    pub fn check_admin(role: UserRole) -> Result<(), EnrollmentError> {
        role.authorize(Permission::EnrollStudents)?;
        Ok(())
    }

    /// The period must accept enrollments and have a free seat.
    pub fn check_period(
        code: &str,
        status: PeriodStatus,
        ledger: &SeatLedger,
    ) -> Result<(), EnrollmentError> {
        if !status.accepts_enrollment() {
            return Err(EnrollmentError::NotAvailable {
                period: code.to_string(),
                status,
            });
        }
        if !ledger.has_seat() {
            return Err(EnrollmentError::CapacityExceeded {
                period: code.to_string(),
            });
        }
        Ok(())
    }

    /// Rules for putting a period in a cart.
    ///
    /// Stricter than direct enrollment: the period must already be running.
    pub fn check_cart_item(
        code: &str,
        status: PeriodStatus,
        ledger: &SeatLedger,
        period_course_id: Uuid,
        requested_course_id: Uuid,
    ) -> Result<(), EnrollmentError> {
        if !status.accepts_cart_items() {
            return Err(EnrollmentError::NotAvailable {
                period: code.to_string(),
                status,
            });
        }
        if !ledger.has_seat() {
            return Err(EnrollmentError::CapacityExceeded {
                period: code.to_string(),
            });
        }
        if period_course_id != requested_course_id {
            return Err(EnrollmentError::PeriodCourseMismatch {
                period: code.to_string(),
                course: requested_course_id,
            });
        }
        Ok(())
    }

    /// Amount paid at enrollment must not be negative nor exceed [`MAX_AMOUNT`].
    pub fn check_amount_paid(amount: Decimal) -> Result<(), EnrollmentError> {
        if amount < Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(EnrollmentError::InvalidAmount(amount));
        }
        Ok(())
    }

    /// Discount must be a percentage.
    pub fn check_discount(discount: Decimal) -> Result<(), EnrollmentError> {
        if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
            return Err(EnrollmentError::InvalidDiscount(discount));
        }
        Ok(())
    }

    /// Resolves price, method and notes for an administrator enrollment.
    pub fn admin_terms(
        list_price: Decimal,
        discount: Option<Decimal>,
        payment_method: Option<PaymentMethod>,
        notes: Option<String>,
    ) -> Result<AdminEnrollTerms, EnrollmentError> {
        let discount = discount.unwrap_or(Decimal::ZERO);
        let amount_paid = discounted_price(list_price, discount)?;

        Ok(AdminEnrollTerms {
            amount_paid,
            discount,
            payment_method: payment_method.unwrap_or_default(),
            notes: notes
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| ADMIN_ENROLL_NOTE.to_string()),
        })
    }

    /// Validates an enrollment status change.
    pub fn transition(
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<EnrollmentStatus, EnrollmentError> {
        if from.can_transition_to(to) {
            Ok(to)
        } else {
            Err(EnrollmentError::InvalidTransition { from, to })
        }
    }
}
