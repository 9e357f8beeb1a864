//! Catalog domain types.
//!
//! A course is the offering; a period is one scheduled run of it with its
//! own dates, teachers and seats.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::catalog::error::CatalogError;
use crate::enrollment::pricing::MAX_AMOUNT;

/// Maximum length of a course or period code.
pub const MAX_CODE_LEN: usize = 20;

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    /// Entry level.
    Basic,
    /// Requires the basic course or equivalent experience.
    Intermediate,
    /// Specialization.
    Advanced,
}

impl CourseLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parses a level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a period.
///
/// The valid transitions are:
/// - Planned → InProgress (start)
/// - Planned → Cancelled
/// - InProgress → Finished
/// - InProgress → Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Scheduled, not started yet.
    Planned,
    /// Running.
    InProgress,
    /// Ended normally.
    Finished,
    /// Called off.
    Cancelled,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "finished" => Some(Self::Finished),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if direct enrollment into the period is allowed.
    #[must_use]
    pub const fn accepts_enrollment(&self) -> bool {
        matches!(self, Self::Planned | Self::InProgress)
    }

    /// Returns true if the period can be put in a cart.
    #[must_use]
    pub const fn accepts_cart_items(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns true if the period may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Finished | Self::Cancelled)
        )
    }

    /// Validates a transition, returning the target status.
    pub fn transition_to(self, next: Self) -> Result<Self, CatalogError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CatalogError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trims and upper-cases a course or period code.
pub fn normalize_code(code: &str) -> Result<String, CatalogError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(CatalogError::Validation("Code is required".to_string()));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(CatalogError::Validation(format!(
            "Code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    Ok(code)
}

fn require(value: &str, field: &str) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Course as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    /// Unique code, normalized to upper case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Length of the course in weeks.
    pub duration_weeks: i32,
    /// Difficulty level.
    pub level: CourseLevel,
    /// List price.
    pub price: Decimal,
    /// Upper bound for the capacity of each period.
    pub max_capacity: i32,
}

impl CourseDraft {
    /// Validates and normalizes the draft.
    pub fn validate(self) -> Result<Self, CatalogError> {
        let code = normalize_code(&self.code)?;
        let name = require(&self.name, "Name")?;
        if self.duration_weeks < 1 {
            return Err(CatalogError::Validation(
                "Duration must be at least one week".to_string(),
            ));
        }
        if self.price.is_sign_negative() {
            return Err(CatalogError::Validation(
                "Price cannot be negative".to_string(),
            ));
        }
        if self.price > MAX_AMOUNT {
            return Err(CatalogError::Validation(format!(
                "Price cannot exceed {MAX_AMOUNT}"
            )));
        }
        if self.max_capacity < 1 {
            return Err(CatalogError::Validation(
                "Max capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            code,
            name,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ..self
        })
    }
}

/// Period as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDraft {
    /// Course being offered.
    pub course_id: Uuid,
    /// Unique code, normalized to upper case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Schedule text, e.g. "Mon-Wed 18:00-21:00".
    pub schedule: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Seats offered. Defaults to the course's max capacity.
    pub capacity: Option<i32>,
    /// Assigned teachers.
    pub teacher_ids: Vec<Uuid>,
}

/// A period draft that passed validation against its course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPeriod {
    /// Course being offered.
    pub course_id: Uuid,
    /// Normalized code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Schedule text.
    pub schedule: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Total seats, fixed at creation.
    pub capacity: i32,
    /// Assigned teachers, deduplicated.
    pub teacher_ids: Vec<Uuid>,
}

impl PeriodDraft {
    /// Validates the draft against the course's max capacity.
    pub fn validate(self, course_max_capacity: i32) -> Result<NewPeriod, CatalogError> {
        let code = normalize_code(&self.code)?;
        let name = require(&self.name, "Name")?;
        if self.start_date > self.end_date {
            return Err(CatalogError::Validation(
                "Start date must not be after end date".to_string(),
            ));
        }

        let capacity = self.capacity.unwrap_or(course_max_capacity);
        if capacity < 1 || capacity > course_max_capacity {
            return Err(CatalogError::Validation(format!(
                "Capacity must be between 1 and {course_max_capacity}"
            )));
        }

        let mut teacher_ids = self.teacher_ids;
        teacher_ids.sort_unstable();
        teacher_ids.dedup();

        Ok(NewPeriod {
            course_id: self.course_id,
            code,
            name,
            start_date: self.start_date,
            end_date: self.end_date,
            schedule: self.schedule,
            notes: self.notes,
            capacity,
            teacher_ids,
        })
    }
}
