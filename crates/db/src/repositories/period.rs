//! Period repository and the seat ledger updates.
//!
//! [`admit_seat`] and [`release_seat`] are the only writers of
//! `periods.seats_occupied`. Both are single conditional `UPDATE`s, so the
//! check and the write cannot be interleaved by another request.

use academy_core::auth::UserRole;
use academy_core::catalog::{CatalogError, PeriodDraft, PeriodStatus, SeatLedger};
use academy_shared::types::PeriodId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use super::is_unique_violation;
use super::user::role_of;
use crate::entities::{courses, period_teachers, periods};

fn db_err(err: DbErr) -> CatalogError {
    CatalogError::Database(err.to_string())
}

/// Filter for listing periods.
#[derive(Debug, Clone, Default)]
pub struct PeriodFilter {
    /// Only periods of this course.
    pub course_id: Option<Uuid>,
    /// Only periods in this status.
    pub status: Option<PeriodStatus>,
}

/// A period with its assigned teachers.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodWithTeachers {
    /// The period record.
    pub period: periods::Model,
    /// Assigned teacher IDs.
    pub teacher_ids: Vec<Uuid>,
}

/// Takes one seat if any is free.
///
/// Returns `false` when the period is full or does not exist. Run it on the
/// transaction that inserts the enrollment.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn admit_seat<C: ConnectionTrait>(conn: &C, period_id: Uuid) -> Result<bool, DbErr> {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let result = periods::Entity::update_many()
        .col_expr(
            periods::Column::SeatsOccupied,
            Expr::col(periods::Column::SeatsOccupied).add(1),
        )
        .col_expr(periods::Column::UpdatedAt, Expr::value(now))
        .filter(periods::Column::Id.eq(period_id))
        .filter(Expr::col(periods::Column::SeatsOccupied).lt(Expr::col(periods::Column::Capacity)))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Gives one seat back, never going below zero.
///
/// Returns `false` when nothing was occupied.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn release_seat<C: ConnectionTrait>(conn: &C, period_id: Uuid) -> Result<bool, DbErr> {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let result = periods::Entity::update_many()
        .col_expr(
            periods::Column::SeatsOccupied,
            Expr::col(periods::Column::SeatsOccupied).sub(1),
        )
        .col_expr(periods::Column::UpdatedAt, Expr::value(now))
        .filter(periods::Column::Id.eq(period_id))
        .filter(periods::Column::SeatsOccupied.gt(0))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Rebuilds the in-memory ledger of a stored period.
pub fn ledger_of(period: &periods::Model) -> Result<SeatLedger, CatalogError> {
    SeatLedger::from_counts(period.capacity, period.seats_occupied)
}

/// Period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and inserts a period with its teachers.
    ///
    /// The period starts `planned` with no occupied seats.
    ///
    /// # Errors
    ///
    /// Returns `CourseNotFound`, `Validation` (bad input or a teacher ID that
    /// is not a teacher) or `DuplicateCode`.
    pub async fn create(&self, draft: PeriodDraft) -> Result<PeriodWithTeachers, CatalogError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let course = courses::Entity::find_by_id(draft.course_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::CourseNotFound(draft.course_id))?;

        let new = draft.validate(course.max_capacity)?;

        for teacher_id in &new.teacher_ids {
            if role_of(&txn, *teacher_id).await.map_err(db_err)? != Some(UserRole::Teacher) {
                return Err(CatalogError::Validation(format!(
                    "User {teacher_id} is not a teacher"
                )));
            }
        }

        let now = chrono::Utc::now().into();
        let period = periods::ActiveModel {
            id: Set(PeriodId::new().into_inner()),
            course_id: Set(new.course_id),
            code: Set(new.code.clone()),
            name: Set(new.name),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            schedule: Set(new.schedule),
            notes: Set(new.notes),
            status: Set(PeriodStatus::Planned.into()),
            capacity: Set(new.capacity),
            seats_occupied: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let period = period.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateCode(new.code.clone())
            } else {
                db_err(e)
            }
        })?;

        for teacher_id in &new.teacher_ids {
            period_teachers::ActiveModel {
                period_id: Set(period.id),
                teacher_id: Set(*teacher_id),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            period_id = %period.id,
            code = %period.code,
            capacity = period.capacity,
            "Period created"
        );

        Ok(PeriodWithTeachers {
            period,
            teacher_ids: new.teacher_ids,
        })
    }

    /// Gets a period by ID.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if it does not exist.
    pub async fn get(&self, id: Uuid) -> Result<periods::Model, CatalogError> {
        periods::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::PeriodNotFound(id))
    }

    /// Gets a period with its teachers.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if it does not exist.
    pub async fn get_with_teachers(&self, id: Uuid) -> Result<PeriodWithTeachers, CatalogError> {
        let period = self.get(id).await?;
        let teacher_ids = period_teachers::Entity::find()
            .filter(period_teachers::Column::PeriodId.eq(id))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|pt| pt.teacher_id)
            .collect();

        Ok(PeriodWithTeachers {
            period,
            teacher_ids,
        })
    }

    /// Lists periods, newest start date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: PeriodFilter) -> Result<Vec<periods::Model>, CatalogError> {
        let mut query = periods::Entity::find();
        if let Some(course_id) = filter.course_id {
            query = query.filter(periods::Column::CourseId.eq(course_id));
        }
        if let Some(status) = filter.status {
            let status: crate::entities::sea_orm_active_enums::PeriodStatus = status.into();
            query = query.filter(periods::Column::Status.eq(status));
        }

        query
            .order_by_desc(periods::Column::StartDate)
            .order_by_asc(periods::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Moves a period to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` or `InvalidTransition`.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PeriodStatus,
    ) -> Result<periods::Model, CatalogError> {
        let period = self.get(id).await?;
        let current: PeriodStatus = period.status.into();
        let next = current.transition_to(status)?;

        let mut active: periods::ActiveModel = period.into();
        active.status = Set(next.into());
        active.updated_at = Set(chrono::Utc::now().into());
        let period = active.update(&self.db).await.map_err(db_err)?;

        tracing::info!(period_id = %id, from = %current, to = %next, "Period status changed");
        Ok(period)
    }

    /// Changes a period's total capacity.
    ///
    /// The new capacity must not be below the seats already occupied. The
    /// check is part of the `UPDATE` so a concurrent enrollment cannot slip
    /// in between.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `Validation` or `CapacityBelowOccupied`.
    pub async fn update_capacity(
        &self,
        id: Uuid,
        capacity: i32,
    ) -> Result<periods::Model, CatalogError> {
        let period = self.get(id).await?;
        let mut ledger = ledger_of(&period)?;
        ledger.resize(capacity)?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = periods::Entity::update_many()
            .col_expr(periods::Column::Capacity, Expr::value(capacity))
            .col_expr(periods::Column::UpdatedAt, Expr::value(now))
            .filter(periods::Column::Id.eq(id))
            .filter(periods::Column::SeatsOccupied.lte(capacity))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let period = self.get(id).await?;
        if result.rows_affected == 0 {
            return Err(CatalogError::CapacityBelowOccupied {
                capacity,
                occupied: period.seats_occupied,
            });
        }

        tracing::info!(period_id = %id, capacity, "Period capacity changed");
        Ok(period)
    }
}
