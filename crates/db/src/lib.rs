//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories for users, the catalog, enrollments and carts
//! - Database migrations
//!
//! Seat counters are only ever changed by the conditional updates in
//! [`repositories::period`], always inside the transaction that creates or
//! deletes the matching enrollment.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CartRepository, CourseRepository, EnrollmentRepository, PeriodRepository, UserRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
