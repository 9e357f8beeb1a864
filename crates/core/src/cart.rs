//! Cart lifecycle.
//!
//! A student has at most one cart. It is `active` while being filled,
//! becomes `processed` after a checkout converted every item, and is
//! reactivated by the next item added to it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Being filled.
    #[default]
    Active,
    /// Checked out.
    Processed,
    /// Left untouched.
    Abandoned,
}

impl CartStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Processed => "processed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Status after an item is added.
    #[must_use]
    pub const fn after_item_added(self) -> Self {
        Self::Active
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sum of item prices.
pub fn cart_total<I>(prices: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    prices.into_iter().sum()
}
