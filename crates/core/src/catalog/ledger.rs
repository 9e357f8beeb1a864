//! Seat accounting for a period.
//!
//! A period stores its total `capacity` and the number of `occupied` seats.
//! Available seats are always derived, so the two can never drift apart.
//! Reads go through this type: eligibility checks use [`SeatLedger::has_seat`]
//! and capacity changes use [`SeatLedger::resize`]. Writes to the stored
//! counters happen only in the period repository's `admit_seat` and
//! `release_seat` conditional updates; [`SeatLedger::admit`] and
//! [`SeatLedger::release`] are the in-memory model of those two statements
//! and are what the property tests check conservation against.

use serde::Serialize;

use crate::catalog::error::CatalogError;

/// Capacity and occupancy of one period.
///
/// Invariant: `0 <= occupied <= capacity` and `capacity >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatLedger {
    capacity: i32,
    occupied: i32,
}

impl SeatLedger {
    /// Creates an empty ledger.
    pub fn new(capacity: i32) -> Result<Self, CatalogError> {
        Self::from_counts(capacity, 0)
    }

    /// Rebuilds a ledger from stored counters.
    pub fn from_counts(capacity: i32, occupied: i32) -> Result<Self, CatalogError> {
        if capacity < 1 {
            return Err(CatalogError::Validation(
                "Capacity must be at least 1".to_string(),
            ));
        }
        if occupied < 0 {
            return Err(CatalogError::Validation(
                "Occupied seats cannot be negative".to_string(),
            ));
        }
        if occupied > capacity {
            return Err(CatalogError::CapacityBelowOccupied { capacity, occupied });
        }
        Ok(Self { capacity, occupied })
    }

    /// Total seats.
    #[must_use]
    pub const fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Seats taken by enrollments.
    #[must_use]
    pub const fn occupied(&self) -> i32 {
        self.occupied
    }

    /// Seats still free.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.capacity - self.occupied
    }

    /// Returns true if at least one seat is free.
    #[must_use]
    pub const fn has_seat(&self) -> bool {
        self.occupied < self.capacity
    }

    /// Takes a seat. Returns false, leaving the ledger untouched, when full.
    ///
    /// Mirrors `UPDATE .. SET seats_occupied = seats_occupied + 1
    /// WHERE seats_occupied < capacity`, where zero affected rows is `false`.
    pub fn admit(&mut self) -> bool {
        if !self.has_seat() {
            return false;
        }
        self.occupied += 1;
        true
    }

    /// Gives a seat back. Returns false when nothing was occupied.
    ///
    /// Mirrors `UPDATE .. SET seats_occupied = seats_occupied - 1
    /// WHERE seats_occupied > 0`.
    pub fn release(&mut self) -> bool {
        if self.occupied == 0 {
            return false;
        }
        self.occupied -= 1;
        true
    }

    /// Changes the total capacity, never below the occupied seats.
    pub fn resize(&mut self, capacity: i32) -> Result<(), CatalogError> {
        if capacity < 1 {
            return Err(CatalogError::Validation(
                "Capacity must be at least 1".to_string(),
            ));
        }
        if capacity < self.occupied {
            return Err(CatalogError::CapacityBelowOccupied {
                capacity,
                occupied: self.occupied,
            });
        }
        self.capacity = capacity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = SeatLedger::new(12).unwrap();
        assert_eq!(ledger.available(), 12);
        assert_eq!(ledger.occupied(), 0);
        assert!(ledger.has_seat());
    }

    #[test]
    fn test_admit_until_full() {
        let mut ledger = SeatLedger::new(2).unwrap();
        assert!(ledger.admit());
        assert!(ledger.admit());
        assert!(!ledger.admit());
        assert_eq!(ledger.available(), 0);
        assert_eq!(ledger.occupied(), 2);
    }

    #[test]
    fn test_release_floors_at_zero() {
        let mut ledger = SeatLedger::new(1).unwrap();
        assert!(!ledger.release());
        assert!(ledger.admit());
        assert!(ledger.release());
        assert_eq!(ledger.available(), 1);
    }

    #[test]
    fn test_resize_respects_occupied() {
        let mut ledger = SeatLedger::from_counts(10, 6).unwrap();
        assert!(matches!(
            ledger.resize(5),
            Err(CatalogError::CapacityBelowOccupied {
                capacity: 5,
                occupied: 6
            })
        ));
        ledger.resize(6).unwrap();
        assert_eq!(ledger.available(), 0);
        ledger.resize(15).unwrap();
        assert_eq!(ledger.available(), 9);
    }

    #[test]
    fn test_from_counts_rejects_inconsistent_values() {
        assert!(SeatLedger::from_counts(0, 0).is_err());
        assert!(SeatLedger::from_counts(5, -1).is_err());
        assert!(SeatLedger::from_counts(5, 6).is_err());
        assert!(SeatLedger::from_counts(5, 5).is_ok());
    }
}
