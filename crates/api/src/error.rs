//! JSON error responses.
//!
//! Every error leaves the API as `{"error": <code>, "message": <text>}`.
//! Server-side failures are logged and their details withheld.

use academy_core::catalog::CatalogError;
use academy_core::enrollment::EnrollmentError;
use academy_shared::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Builds an error response with the standard body.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Builds a 500 response after logging the cause.
pub fn internal_error(context: &str, cause: &dyn std::fmt::Display) -> Response {
    error!(error = %cause, "{context}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An error occurred",
    )
}

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Maps an application error to a response.
pub fn map_app_error(e: &AppError) -> Response {
    if let AppError::Database(_) = e {
        return internal_error("Request failed", e);
    }
    error_response(status_of(e.status_code()), e.error_code(), e.public_message())
}

/// Maps an enrollment or cart error to a response.
pub fn map_enrollment_error(e: &EnrollmentError) -> Response {
    if let EnrollmentError::Database(_) = e {
        return internal_error("Enrollment operation failed", e);
    }
    error_response(status_of(e.status_code()), e.error_code(), e.to_string())
}

/// Maps a catalog error to a response.
pub fn map_catalog_error(e: &CatalogError) -> Response {
    if let CatalogError::Database(_) = e {
        return internal_error("Catalog operation failed", e);
    }
    error_response(status_of(e.status_code()), e.error_code(), e.to_string())
}
