//! Authentication middleware for protected routes.

use academy_core::auth::{Permission, UserRole};
use academy_shared::{Claims, JwtError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::error_response;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            error_response(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired")
        }
        Err(_) => error_response(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Invalid or malformed token",
        ),
    }
}

/// Extractor for the authenticated user.
///
/// The role comes from the token and is only good for route gating;
/// enrollment and cart operations re-read it from the user store.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the role named in the token, if it is a known one.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.0.role)
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }

    /// Checks the token role against a permission.
    ///
    /// # Errors
    ///
    /// Returns a 403 response if the role lacks the permission.
    pub fn authorize(&self, permission: Permission) -> Result<UserRole, Response> {
        let Some(role) = self.role() else {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                format!("Unknown role {}", self.0.role),
            ));
        };
        role
            .authorize(permission)
            .map(|()| role)
            .map_err(|e| error_response(StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string()))
    }

    /// True if the token belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def", Some("abc.def"))]
    #[case("bearer abc.def", Some("abc.def"))]
    #[case("Bearer ", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("abc.def", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }

    #[rstest]
    #[case("student", Permission::UseCart, true)]
    #[case("teacher", Permission::UseCart, false)]
    #[case("admin", Permission::ManageEnrollments, true)]
    #[case("student", Permission::ManageCatalog, false)]
    #[case("janitor", Permission::ViewCatalog, false)]
    fn test_authorize_by_token_role(
        #[case] role: &str,
        #[case] permission: Permission,
        #[case] allowed: bool,
    ) {
        let claims = Claims::new(Uuid::nil(), role, chrono::Utc::now());
        let user = AuthUser(claims);
        assert_eq!(user.authorize(permission).is_ok(), allowed);
    }
}
