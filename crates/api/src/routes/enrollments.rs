//! Enrollment routes.
//!
//! Administrators enroll students directly, manage enrollments and record
//! payments. Students see their own enrollments and may pay on them.

use academy_core::auth::Permission;
use academy_core::enrollment::{
    EnrollmentDocument, EnrollmentError, EnrollmentStatus, PaymentMethod,
};
use academy_db::EnrollmentRepository;
use academy_db::entities::enrollments;
use academy_db::repositories::{
    AdminEnrollInput, EnrollInput, EnrollmentFilter, PaymentInput, UpdateEnrollmentInput,
};
use academy_shared::types::PageRequest;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{error_response, map_enrollment_error};
use crate::middleware::AuthUser;

/// Creates the enrollment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_enrollments).post(enroll))
        .route("/enrollments/admin", post(admin_enroll))
        .route("/enrollments/mine", get(my_enrollments))
        .route(
            "/enrollments/{enrollment_id}",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
        .route("/enrollments/{enrollment_id}/payments", post(add_payment))
}

/// Request body for a direct enrollment.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    /// Student to enroll.
    pub student_id: Uuid,
    /// Target period.
    pub period_id: Uuid,
    /// Course, defaults to the period's course.
    pub course_id: Option<Uuid>,
    /// Payment method, cash if omitted.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Amount received, zero if omitted.
    #[serde(default)]
    pub amount_paid: Decimal,
    /// Discount percentage, zero if omitted.
    #[serde(default)]
    pub discount: Decimal,
    /// Notes.
    pub notes: Option<String>,
    /// Documents handed in.
    #[serde(default)]
    pub documents: Vec<EnrollmentDocument>,
}

/// Request body for an administrator enrollment.
#[derive(Debug, Deserialize)]
pub struct AdminEnrollRequest {
    /// Student to enroll.
    pub student_id: Uuid,
    /// Target period.
    pub period_id: Uuid,
    /// Payment method, cash if omitted.
    pub payment_method: Option<PaymentMethod>,
    /// Discount percentage over the list price.
    pub discount: Option<Decimal>,
    /// Notes.
    pub notes: Option<String>,
}

/// Query parameters for listing enrollments.
#[derive(Debug, Deserialize)]
pub struct ListEnrollmentsQuery {
    /// Only this student's enrollments.
    pub student_id: Option<Uuid>,
    /// Only enrollments in this period.
    pub period_id: Option<Uuid>,
    /// Only enrollments in this status.
    pub status: Option<EnrollmentStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for updating an enrollment.
#[derive(Debug, Deserialize)]
pub struct UpdateEnrollmentRequest {
    /// New status.
    pub status: Option<EnrollmentStatus>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid, must be positive.
    pub amount: Decimal,
    /// Payment method, cash if omitted.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Receipt number.
    pub receipt: Option<String>,
}

/// Loads an enrollment the caller may see: any for admins, only their
/// own for everyone else.
async fn load_visible(
    repo: &EnrollmentRepository,
    auth: &AuthUser,
    enrollment_id: Uuid,
) -> Result<enrollments::Model, Response> {
    let enrollment = match repo.find_by_id(enrollment_id).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            return Err(map_enrollment_error(&EnrollmentError::EnrollmentNotFound(
                enrollment_id,
            )));
        }
        Err(e) => return Err(map_enrollment_error(&e)),
    };

    if auth.is_admin() || enrollment.student_id == auth.user_id() {
        Ok(enrollment)
    } else {
        Err(error_response(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "You may only access your own enrollments",
        ))
    }
}

/// POST /enrollments - Enroll a student directly (admin).
async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EnrollRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::EnrollStudents) {
        return response;
    }

    let input = EnrollInput {
        student_id: payload.student_id,
        period_id: payload.period_id,
        course_id: payload.course_id,
        payment_method: payload.payment_method,
        amount_paid: payload.amount_paid,
        discount: payload.discount,
        notes: payload.notes,
        documents: payload.documents,
    };

    match EnrollmentRepository::new((*state.db).clone())
        .enroll(input)
        .await
    {
        Ok(enrollment) => (StatusCode::CREATED, Json(enrollment)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// POST /enrollments/admin - Enroll at list price less a discount (admin).
async fn admin_enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AdminEnrollRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::EnrollStudents) {
        return response;
    }

    let input = AdminEnrollInput {
        admin_id: auth.user_id(),
        student_id: payload.student_id,
        period_id: payload.period_id,
        payment_method: payload.payment_method,
        discount: payload.discount,
        notes: payload.notes,
    };

    match EnrollmentRepository::new((*state.db).clone())
        .admin_enroll(input)
        .await
    {
        Ok(enrollment) => (StatusCode::CREATED, Json(enrollment)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// GET /enrollments - List enrollments with filters and pagination (admin).
async fn list_enrollments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListEnrollmentsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageEnrollments) {
        return response;
    }

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = EnrollmentFilter {
        student_id: query.student_id,
        period_id: query.period_id,
        status: query.status,
    };

    match EnrollmentRepository::new((*state.db).clone())
        .list(filter, &page)
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// GET /enrollments/mine - The student's own enrollments.
async fn my_enrollments(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ViewOwnEnrollments) {
        return response;
    }

    match EnrollmentRepository::new((*state.db).clone())
        .list_by_student(auth.user_id())
        .await
    {
        Ok(enrollments) => (StatusCode::OK, Json(enrollments)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// GET /enrollments/{enrollment_id} - One enrollment with payments and documents.
async fn get_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());
    if let Err(response) = load_visible(&repo, &auth, enrollment_id).await {
        return response;
    }

    match repo.get(enrollment_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// PUT /enrollments/{enrollment_id} - Change status or notes (admin).
async fn update_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    Json(payload): Json<UpdateEnrollmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageEnrollments) {
        return response;
    }

    let input = UpdateEnrollmentInput {
        status: payload.status,
        notes: payload.notes,
    };
    match EnrollmentRepository::new((*state.db).clone())
        .update(enrollment_id, input)
        .await
    {
        Ok(enrollment) => (StatusCode::OK, Json(enrollment)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// DELETE /enrollments/{enrollment_id} - Delete and free the seat (admin).
async fn delete_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::ManageEnrollments) {
        return response;
    }

    match EnrollmentRepository::new((*state.db).clone())
        .delete(enrollment_id)
        .await
    {
        Ok(()) => {
            info!(enrollment_id = %enrollment_id, admin_id = %auth.user_id(), "Enrollment removed via API");
            (
                StatusCode::OK,
                Json(json!({ "message": "Enrollment deleted" })),
            )
                .into_response()
        }
        Err(e) => map_enrollment_error(&e),
    }
}

/// POST /enrollments/{enrollment_id}/payments - Record a payment (admin or owner).
async fn add_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());
    if let Err(response) = load_visible(&repo, &auth, enrollment_id).await {
        return response;
    }

    let input = PaymentInput {
        amount: payload.amount,
        payment_method: payload.payment_method,
        receipt: payload.receipt,
    };
    match repo.add_payment(enrollment_id, input).await {
        Ok(enrollment) => (StatusCode::CREATED, Json(enrollment)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}
