//! Period routes: listing, creation, status and capacity.

use academy_core::auth::Permission;
use academy_core::catalog::{PeriodDraft, PeriodStatus};
use academy_db::PeriodRepository;
use academy_db::entities::periods;
use academy_db::repositories::{PeriodFilter, PeriodWithTeachers};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::map_catalog_error;
use crate::middleware::AuthUser;

/// Creates the period routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods", get(list_periods).post(create_period))
        .route("/periods/{period_id}", get(get_period))
        .route("/periods/{period_id}/status", put(update_status))
        .route("/periods/{period_id}/capacity", put(update_capacity))
}

/// Query parameters for listing periods.
#[derive(Debug, Deserialize)]
pub struct ListPeriodsQuery {
    /// Only periods of this course.
    pub course_id: Option<Uuid>,
    /// Only periods in this status.
    pub status: Option<PeriodStatus>,
}

/// Request body for creating a period.
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// Course being offered.
    pub course_id: Uuid,
    /// Unique period code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// First day (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// Last day (YYYY-MM-DD).
    pub end_date: NaiveDate,
    /// Schedule text.
    pub schedule: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Seats offered, defaults to the course's max capacity.
    pub capacity: Option<i32>,
    /// Assigned teachers.
    #[serde(default)]
    pub teacher_ids: Vec<Uuid>,
}

/// Request body for changing the status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: PeriodStatus,
}

/// Request body for changing the capacity.
#[derive(Debug, Deserialize)]
pub struct UpdateCapacityRequest {
    /// New total capacity.
    pub capacity: i32,
}

/// A period with its derived seat availability.
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// The period record.
    #[serde(flatten)]
    pub period: periods::Model,
    /// Seats still free.
    pub seats_available: i32,
    /// Assigned teachers, when loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_ids: Option<Vec<Uuid>>,
}

impl From<periods::Model> for PeriodResponse {
    fn from(period: periods::Model) -> Self {
        Self {
            seats_available: period.seats_available(),
            period,
            teacher_ids: None,
        }
    }
}

impl From<PeriodWithTeachers> for PeriodResponse {
    fn from(loaded: PeriodWithTeachers) -> Self {
        Self {
            teacher_ids: Some(loaded.teacher_ids),
            ..Self::from(loaded.period)
        }
    }
}

/// GET /periods - List periods, optionally by course and status.
async fn list_periods(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListPeriodsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ViewCatalog) {
        return response;
    }

    let filter = PeriodFilter {
        course_id: query.course_id,
        status: query.status,
    };
    match PeriodRepository::new((*state.db).clone()).list(filter).await {
        Ok(periods) => {
            let body: Vec<PeriodResponse> = periods.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => map_catalog_error(&e),
    }
}

/// GET /periods/{period_id} - Get a period with its teachers.
async fn get_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(period_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ViewCatalog) {
        return response;
    }

    match PeriodRepository::new((*state.db).clone())
        .get_with_teachers(period_id)
        .await
    {
        Ok(loaded) => (StatusCode::OK, Json(PeriodResponse::from(loaded))).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}

/// POST /periods - Create a period (admin).
async fn create_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePeriodRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageCatalog) {
        return response;
    }

    let draft = PeriodDraft {
        course_id: payload.course_id,
        code: payload.code,
        name: payload.name,
        start_date: payload.start_date,
        end_date: payload.end_date,
        schedule: payload.schedule,
        notes: payload.notes,
        capacity: payload.capacity,
        teacher_ids: payload.teacher_ids,
    };

    match PeriodRepository::new((*state.db).clone()).create(draft).await {
        Ok(created) => (StatusCode::CREATED, Json(PeriodResponse::from(created))).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}

/// PUT /periods/{period_id}/status - Move a period through its lifecycle (admin).
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(period_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageCatalog) {
        return response;
    }

    match PeriodRepository::new((*state.db).clone())
        .update_status(period_id, payload.status)
        .await
    {
        Ok(period) => (StatusCode::OK, Json(PeriodResponse::from(period))).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}

/// PUT /periods/{period_id}/capacity - Change total capacity (admin).
async fn update_capacity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(period_id): Path<Uuid>,
    Json(payload): Json<UpdateCapacityRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageCatalog) {
        return response;
    }

    match PeriodRepository::new((*state.db).clone())
        .update_capacity(period_id, payload.capacity)
        .await
    {
        Ok(period) => (StatusCode::OK, Json(PeriodResponse::from(period))).into_response(),
        Err(e) => map_catalog_error(&e),
    }
}
