//! Course catalog routes.

use academy_core::auth::Permission;
use academy_core::catalog::{CourseDraft, CourseLevel};
use academy_db::CourseRepository;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::map_catalog_error;
use crate::middleware::AuthUser;

/// Creates the course routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{course_id}", get(get_course))
}

/// Query parameters for listing courses.
#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    /// Include deactivated courses (admin only, default false).
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a course.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    /// Unique course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Duration in weeks.
    pub duration_weeks: i32,
    /// basic, intermediate or advanced.
    pub level: CourseLevel,
    /// List price.
    pub price: Decimal,
    /// Upper bound for the capacity of each period.
    pub max_capacity: i32,
}

/// GET /courses - List courses ordered by code.
async fn list_courses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListCoursesQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ViewCatalog) {
        return response;
    }

    let active_only = !(query.include_inactive && auth.is_admin());
    match CourseRepository::new((*state.db).clone())
        .list(active_only)
        .await
    {
        Ok(courses) => (StatusCode::OK, Json(courses)).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}

/// GET /courses/{course_id} - Get one course.
async fn get_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ViewCatalog) {
        return response;
    }

    match CourseRepository::new((*state.db).clone())
        .get(course_id)
        .await
    {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}

/// POST /courses - Create a course (admin).
async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageCatalog) {
        return response;
    }

    let draft = CourseDraft {
        code: payload.code,
        name: payload.name,
        description: payload.description,
        duration_weeks: payload.duration_weeks,
        level: payload.level,
        price: payload.price,
        max_capacity: payload.max_capacity,
    };

    match CourseRepository::new((*state.db).clone())
        .create(draft)
        .await
    {
        Ok(course) => {
            info!(course_id = %course.id, admin_id = %auth.user_id(), "Course created via API");
            (StatusCode::CREATED, Json(course)).into_response()
        }
        Err(e) => map_catalog_error(&e),
    }
}
