//! Shopping cart routes for students.

use academy_core::auth::Permission;
use academy_core::enrollment::PaymentMethod;
use academy_db::CartRepository;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::map_enrollment_error;
use crate::middleware::AuthUser;

/// Creates the cart routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/{item_id}", delete(remove_item))
        .route("/cart/clear", delete(clear_cart))
        .route("/cart/checkout", post(checkout))
}

/// Request body for adding an item.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Course to take.
    pub course_id: Uuid,
    /// Period of that course.
    pub period_id: Uuid,
}

/// Request body for checking out.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// How the student pays, cash if omitted.
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// GET /cart - The student's cart, created on first access.
async fn get_cart(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::UseCart) {
        return response;
    }

    match CartRepository::new((*state.db).clone())
        .get_or_create(auth.user_id())
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// POST /cart/items - Add a (course, period) pair.
async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AddItemRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::UseCart) {
        return response;
    }

    match CartRepository::new((*state.db).clone())
        .add_item(auth.user_id(), payload.course_id, payload.period_id)
        .await
    {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// DELETE /cart/items/{item_id} - Remove one item.
async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::UseCart) {
        return response;
    }

    match CartRepository::new((*state.db).clone())
        .remove_item(auth.user_id(), item_id)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// DELETE /cart/clear - Remove every item.
async fn clear_cart(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::UseCart) {
        return response;
    }

    match CartRepository::new((*state.db).clone())
        .clear(auth.user_id())
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}

/// POST /cart/checkout - Enroll in every item, all or nothing.
async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Option<Json<CheckoutRequest>>,
) -> impl IntoResponse {
    if let Err(response) = auth.authorize(Permission::UseCart) {
        return response;
    }

    let payment_method = payload
        .map(|Json(body)| body.payment_method)
        .unwrap_or_default();
    match CartRepository::new((*state.db).clone())
        .checkout(auth.user_id(), payment_method)
        .await
    {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => map_enrollment_error(&e),
    }
}
