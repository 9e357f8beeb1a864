//! Course repository.

use academy_core::catalog::{CatalogError, CourseDraft};
use academy_shared::types::CourseId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::courses;

fn db_err(err: DbErr) -> CatalogError {
    CatalogError::Database(err.to_string())
}

/// Course repository.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    db: DatabaseConnection,
}

impl CourseRepository {
    /// Creates a new course repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and inserts a course.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `DuplicateCode` if the code is taken.
    pub async fn create(&self, draft: CourseDraft) -> Result<courses::Model, CatalogError> {
        let draft = draft.validate()?;
        let code = draft.code.clone();
        let now = chrono::Utc::now().into();

        let course = courses::ActiveModel {
            id: Set(CourseId::new().into_inner()),
            code: Set(draft.code),
            name: Set(draft.name),
            description: Set(draft.description),
            duration_weeks: Set(draft.duration_weeks),
            level: Set(draft.level.into()),
            price: Set(draft.price),
            max_capacity: Set(draft.max_capacity),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let course = course.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateCode(code)
            } else {
                db_err(e)
            }
        })?;

        tracing::info!(course_id = %course.id, code = %course.code, "Course created");
        Ok(course)
    }

    /// Gets a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `CourseNotFound` if it does not exist.
    pub async fn get(&self, id: Uuid) -> Result<courses::Model, CatalogError> {
        courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::CourseNotFound(id))
    }

    /// Lists courses ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<courses::Model>, CatalogError> {
        let mut query = courses::Entity::find();
        if active_only {
            query = query.filter(courses::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
