//! Property-based tests for the seat ledger.

use proptest::prelude::*;

use crate::catalog::ledger::SeatLedger;

#[derive(Debug, Clone, Copy)]
enum Op {
    Admit,
    Release,
    Resize(i32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Admit),
        2 => Just(Op::Release),
        1 => (1..60i32).prop_map(Op::Resize),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// available + occupied == capacity and available >= 0 after any sequence.
    #[test]
    fn prop_ledger_is_conserved(
        capacity in 1..50i32,
        ops in prop::collection::vec(arb_op(), 0..200)
    ) {
        let mut ledger = SeatLedger::new(capacity).unwrap();
        for op in ops {
            match op {
                Op::Admit => { ledger.admit(); }
                Op::Release => { ledger.release(); }
                Op::Resize(c) => { let _ = ledger.resize(c); }
            }
            prop_assert_eq!(ledger.available() + ledger.occupied(), ledger.capacity());
            prop_assert!(ledger.available() >= 0);
            prop_assert!(ledger.occupied() >= 0);
        }
    }

    /// Admitting into a full ledger never changes it.
    #[test]
    fn prop_full_ledger_rejects_admit(capacity in 1..50i32) {
        let mut ledger = SeatLedger::from_counts(capacity, capacity).unwrap();
        let before = ledger;
        prop_assert!(!ledger.admit());
        prop_assert_eq!(ledger, before);
    }

    /// Each successful admit is undone by exactly one release.
    #[test]
    fn prop_admit_then_release_restores(capacity in 1..50i32, taken in 0..50i32) {
        let taken = taken.min(capacity - 1);
        let mut ledger = SeatLedger::from_counts(capacity, taken).unwrap();
        let before = ledger;
        prop_assert!(ledger.admit());
        prop_assert!(ledger.release());
        prop_assert_eq!(ledger, before);
    }
}
