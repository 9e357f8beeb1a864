//! `SeaORM` Entity for periods table.
//!
//! `capacity` is fixed at creation (admins may raise or lower it, never
//! below `seats_occupied`). Available seats are not stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub schedule: Option<String>,
    pub notes: Option<String>,
    pub status: PeriodStatus,
    pub capacity: i32,
    pub seats_occupied: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Seats still free.
    #[must_use]
    pub const fn seats_available(&self) -> i32 {
        self.capacity - self.seats_occupied
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Courses,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::period_teachers::Entity")]
    PeriodTeachers,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::period_teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeriodTeachers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
