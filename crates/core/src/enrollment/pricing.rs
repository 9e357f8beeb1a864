//! Discounts and payment arithmetic.
//!
//! All amounts are `Decimal` with two decimal places of precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::enrollment::error::EnrollmentError;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest amount a money column holds (`numeric(12,2)`): 9,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Applies a percentage discount to a list price, rounded to cents.
///
/// `discount` must be within `0..=100`.
pub fn discounted_price(list_price: Decimal, discount: Decimal) -> Result<Decimal, EnrollmentError> {
    if discount < Decimal::ZERO || discount > HUNDRED {
        return Err(EnrollmentError::InvalidDiscount(discount));
    }
    if list_price.is_sign_negative() || list_price > MAX_AMOUNT {
        return Err(EnrollmentError::InvalidAmount(list_price));
    }

    let price = list_price
        .checked_mul(HUNDRED - discount)
        .and_then(|p| p.checked_div(HUNDRED))
        .ok_or(EnrollmentError::InvalidAmount(list_price))?;
    Ok(price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Paid and pending amounts of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentState {
    /// Total received so far.
    pub paid: Decimal,
    /// Still owed. Never negative.
    pub pending: Decimal,
}

impl PaymentState {
    /// Creates a payment state.
    #[must_use]
    pub const fn new(paid: Decimal, pending: Decimal) -> Self {
        Self { paid, pending }
    }

    /// Records a payment.
    ///
    /// Overpaying is accepted: `paid` grows by the full amount while
    /// `pending` stops at zero. A payment that would push `paid` past
    /// [`MAX_AMOUNT`] is rejected.
    pub fn apply(self, amount: Decimal) -> Result<Self, EnrollmentError> {
        if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(EnrollmentError::InvalidAmount(amount));
        }
        let paid = self
            .paid
            .checked_add(amount)
            .filter(|paid| *paid <= MAX_AMOUNT)
            .ok_or(EnrollmentError::InvalidAmount(amount))?;
        let pending = self
            .pending
            .checked_sub(amount)
            .map_or(Decimal::ZERO, |p| p.max(Decimal::ZERO));
        Ok(Self { paid, pending })
    }
}
