//! Enrollment domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an enrollment.
///
/// The valid transitions are:
/// - Active ↔ Suspended
/// - Active → Completed
/// - Active | Suspended → Withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Attending.
    Active,
    /// Temporarily on hold.
    Suspended,
    /// Finished the period.
    Completed,
    /// Left the period.
    Withdrawn,
}

impl EnrollmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Completed => "completed",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "completed" => Some(Self::Completed),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    /// Returns true if the enrollment may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Suspended | Self::Completed | Self::Withdrawn)
                | (Self::Suspended, Self::Active | Self::Withdrawn)
        )
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Withdrawn)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the front desk.
    #[default]
    Cash,
    /// Bank transfer.
    Transfer,
    /// Debit or credit card.
    Card,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Card => "card",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "transfer" => Some(Self::Transfer),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of document attached to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// National identity card.
    IdCard,
    /// Secondary school certificate.
    SecondaryCertificate,
}

impl DocumentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IdCard => "id_card",
            Self::SecondaryCertificate => "secondary_certificate",
        }
    }
}

/// A document reference captured at enrollment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentDocument {
    /// What the document is.
    pub kind: DocumentKind,
    /// Where it is stored.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_transitions() {
        use EnrollmentStatus::{Active, Completed, Suspended, Withdrawn};

        assert!(Active.can_transition_to(Suspended));
        assert!(Suspended.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Withdrawn));
        assert!(Suspended.can_transition_to(Withdrawn));

        assert!(!Suspended.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Withdrawn.can_transition_to(Active));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_terminal_statuses_have_no_exit() {
        let all = [
            EnrollmentStatus::Active,
            EnrollmentStatus::Suspended,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Withdrawn,
        ];
        for from in all.iter().filter(|s| s.is_terminal()) {
            assert!(all.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse("Card"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }
}
