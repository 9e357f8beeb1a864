//! Test harness: router over an in-memory database.

#![allow(dead_code)]

use std::sync::Arc;

use academy_api::{AppState, create_router};
use academy_core::auth::{UserRole, hash_password};
use academy_db::UserRepository;
use academy_db::entities::users;
use academy_db::migration::{Migrator, MigratorTrait};
use academy_db::repositories::NewUser;
use academy_shared::{JwtConfig, JwtService};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret-key-for-http-tests".to_string(),
                access_token_expires_minutes: 15,
            })),
        };

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// Creates a user directly in the store and returns it with a token.
    pub async fn user(&self, tag: &str, role: UserRole) -> (users::Model, String) {
        let user = UserRepository::new((*self.state.db).clone())
            .create(NewUser {
                email: format!("{tag}@academy.test"),
                password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
                first_name: tag.to_string(),
                last_name: "Test".to_string(),
                document_number: format!("DOC-{tag}"),
                phone: None,
                role,
            })
            .await
            .expect("Failed to create user");

        let token = self
            .state
            .jwt_service
            .generate_access_token(user.id, role.as_str())
            .expect("Failed to issue token");
        (user, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}

/// Reads a decimal that was serialized as a JSON string.
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .map(str::parse::<rust_decimal::Decimal>)
        .and_then(Result::ok)
        .or_else(|| value.as_f64().and_then(rust_decimal::Decimal::from_f64_retain))
        .expect("Expected a decimal")
}
