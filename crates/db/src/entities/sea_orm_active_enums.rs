//! Enums stored as strings, with conversions to the `academy-core` types.

use academy_core::auth::UserRole as CoreUserRole;
use academy_core::cart::CartStatus as CoreCartStatus;
use academy_core::catalog::{CourseLevel as CoreCourseLevel, PeriodStatus as CorePeriodStatus};
use academy_core::enrollment::{
    DocumentKind as CoreDocumentKind, EnrollmentStatus as CoreEnrollmentStatus,
    PaymentMethod as CorePaymentMethod,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps a stored enum onto its domain twin in both directions.
macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    #[sea_orm(string_value = "advanced")]
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "card")]
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[sea_orm(string_value = "id_card")]
    IdCard,
    #[sea_orm(string_value = "secondary_certificate")]
    SecondaryCertificate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "processed")]
    Processed,
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
}

mirror_enum!(UserRole <=> CoreUserRole { Student, Teacher, Admin });
mirror_enum!(CourseLevel <=> CoreCourseLevel { Basic, Intermediate, Advanced });
mirror_enum!(PeriodStatus <=> CorePeriodStatus { Planned, InProgress, Finished, Cancelled });
mirror_enum!(EnrollmentStatus <=> CoreEnrollmentStatus { Active, Suspended, Completed, Withdrawn });
mirror_enum!(PaymentMethod <=> CorePaymentMethod { Cash, Transfer, Card });
mirror_enum!(DocumentKind <=> CoreDocumentKind { IdCard, SecondaryCertificate });
mirror_enum!(CartStatus <=> CoreCartStatus { Active, Processed, Abandoned });

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_stored_values_match_core_names() {
        for status in PeriodStatus::iter() {
            let core: CorePeriodStatus = status.into();
            assert_eq!(status.to_value(), core.as_str());
            assert_eq!(PeriodStatus::from(core), status);
        }
        for role in UserRole::iter() {
            let core: CoreUserRole = role.into();
            assert_eq!(role.to_value(), core.as_str());
        }
        for status in EnrollmentStatus::iter() {
            let core: CoreEnrollmentStatus = status.into();
            assert_eq!(status.to_value(), core.as_str());
        }
        for kind in DocumentKind::iter() {
            let core: CoreDocumentKind = kind.into();
            assert_eq!(kind.to_value(), core.as_str());
        }
    }
}
