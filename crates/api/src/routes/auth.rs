//! Registration, login and the current user.

use academy_core::auth::{UserRole, hash_password, verify_password};
use academy_db::entities::users;
use academy_db::repositories::{NewUser, UserRepository, is_unique_violation};
use academy_shared::AppError;
use academy_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::info;

use crate::AppState;
use crate::error::{internal_error, map_app_error};
use crate::middleware::AuthUser;

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Auth routes that need a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn user_info(user: users::Model) -> UserInfo {
    let role: UserRole = user.role.into();
    UserInfo {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role: role.as_str().to_string(),
    }
}

/// Issues a token for the user and wraps it in a login response.
fn login_response(state: &AppState, user: users::Model) -> Result<LoginResponse, Response> {
    let role: UserRole = user.role.into();
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str())
        .map_err(|e| internal_error("Failed to generate access token", &e))?;

    Ok(LoginResponse {
        user: user_info(user),
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

fn invalid_credentials() -> Response {
    map_app_error(&AppError::InvalidCredentials)
}

/// POST /auth/login - Authenticate a user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for unknown email");
            return invalid_credentials();
        }
        Err(e) => return internal_error("Database error during login", &e),
    };

    if !user.is_active {
        return map_app_error(&AppError::AccountDisabled);
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => return internal_error("Password verification error", &e),
    }

    let user_id = user.id;
    match login_response(&state, user) {
        Ok(response) => {
            info!(user_id = %user_id, "User logged in");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(response) => response,
    }
}

/// POST /auth/register - Register a new student account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return map_app_error(&e);
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return map_app_error(&AppError::AlreadyRegistered("Email".to_string()));
        }
        Ok(false) => {}
        Err(e) => return internal_error("Database error checking email", &e),
    }

    match user_repo.document_exists(payload.document_number.trim()).await {
        Ok(true) => {
            return map_app_error(&AppError::AlreadyRegistered(
                "Document number".to_string(),
            ));
        }
        Ok(false) => {}
        Err(e) => return internal_error("Database error checking document", &e),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => return internal_error("Failed to hash password", &e),
    };

    let user = match user_repo
        .create(NewUser {
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            document_number: payload.document_number,
            phone: payload.phone,
            role: UserRole::Student,
        })
        .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return map_app_error(&AppError::AlreadyRegistered(
                "Email or document number".to_string(),
            ));
        }
        Err(e) => return internal_error("Failed to create user", &e),
    };

    info!(user_id = %user.id, email = %user.email, "New student registered");

    match login_response(&state, user) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(response) => response,
    }
}

/// GET /auth/me - The authenticated user's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user_info(user))).into_response(),
        Ok(None) => map_app_error(&AppError::NotFound("User not found".to_string())),
        Err(e) => internal_error("Failed to load user", &e),
    }
}
