//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod cart;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod periods;

/// Creates the API router. Everything except health, register and login
/// sits behind the bearer token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(courses::routes())
        .merge(periods::routes())
        .merge(cart::routes())
        .merge(enrollments::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
