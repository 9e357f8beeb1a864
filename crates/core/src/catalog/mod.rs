//! Course and period catalog.
//!
//! # Modules
//!
//! - `types` - Course levels, period lifecycle, validated drafts
//! - `ledger` - Seat accounting for a period
//! - `error` - Catalog-specific error types

pub mod error;
pub mod ledger;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use error::CatalogError;
pub use ledger::SeatLedger;
pub use types::{CourseDraft, CourseLevel, NewPeriod, PeriodDraft, PeriodStatus, normalize_code};
