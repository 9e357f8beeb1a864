//! `SeaORM` Entity for enrollments table.
//!
//! At most one row per (student_id, period_id), enforced by a unique index.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EnrollmentStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub period_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub payment_method: PaymentMethod,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_pending: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount: Decimal,
    pub notes: Option<String>,
    pub enrolled_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::periods::Entity",
        from = "Column::PeriodId",
        to = "super::periods::Column::Id"
    )]
    Periods,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Courses,
    #[sea_orm(has_many = "super::enrollment_payments::Entity")]
    EnrollmentPayments,
    #[sea_orm(has_many = "super::enrollment_documents::Entity")]
    EnrollmentDocuments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periods.def()
    }
}

impl Related<super::enrollment_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentPayments.def()
    }
}

impl Related<super::enrollment_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
