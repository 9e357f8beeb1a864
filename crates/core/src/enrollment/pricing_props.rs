//! Property-based tests for pricing and payments.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::enrollment::error::EnrollmentError;
use crate::enrollment::pricing::{MAX_AMOUNT, PaymentState, discounted_price};

/// Amounts in cents, up to 100k.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis| Decimal::new(basis, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A discounted price never exceeds the list price nor drops below zero.
    #[test]
    fn prop_discounted_price_bounded(list in arb_amount(), discount in arb_discount()) {
        let price = discounted_price(list, discount).unwrap();
        prop_assert!(price >= Decimal::ZERO);
        prop_assert!(price <= list);
        prop_assert!(price.scale() <= 2);
    }

    /// More discount never costs more.
    #[test]
    fn prop_discount_is_monotonic(
        list in arb_amount(),
        a in arb_discount(),
        b in arb_discount()
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(discounted_price(list, high).unwrap() <= discounted_price(list, low).unwrap());
    }

    /// paid grows by exactly the amount; pending shrinks by at most it.
    #[test]
    fn prop_payment_accounting(
        paid in arb_amount(),
        pending in arb_amount(),
        amount in arb_positive_amount()
    ) {
        let after = PaymentState::new(paid, pending).apply(amount).unwrap();
        prop_assert_eq!(after.paid, paid + amount);
        prop_assert!(after.pending >= Decimal::ZERO);
        prop_assert_eq!(after.pending, (pending - amount).max(Decimal::ZERO));
    }

    /// Any positive amount either applies within the column range or is refused.
    #[test]
    fn prop_payment_never_overflows(
        paid in arb_amount(),
        mantissa in 1i64..i64::MAX,
        scale in 0u32..=2
    ) {
        let amount = Decimal::new(mantissa, scale);
        match PaymentState::new(paid, Decimal::ZERO).apply(amount) {
            Ok(after) => prop_assert!(after.paid <= MAX_AMOUNT),
            Err(e) => prop_assert!(matches!(e, EnrollmentError::InvalidAmount(_))),
        }
    }
}
