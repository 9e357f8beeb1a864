//! Shared fixtures for repository tests.
//!
//! Every test gets its own in-memory SQLite database with the real
//! migrations applied. The pool holds exactly one connection so the
//! database lives as long as the pool does.

#![allow(dead_code)]

use academy_core::auth::UserRole;
use academy_core::catalog::{CourseDraft, CourseLevel, PeriodDraft, PeriodStatus};
use academy_db::entities::{courses, periods, users};
use academy_db::migration::{Migrator, MigratorTrait};
use academy_db::repositories::{CourseRepository, NewUser, PeriodRepository, UserRepository};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn setup_db() -> DatabaseConnection {
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
    db
}

pub async fn create_user(db: &DatabaseConnection, tag: &str, role: UserRole) -> users::Model {
    UserRepository::new(db.clone())
        .create(NewUser {
            email: format!("{tag}@academy.test"),
            password_hash: "$argon2id$test_hash".to_string(),
            first_name: tag.to_string(),
            last_name: "Test".to_string(),
            document_number: format!("DOC-{tag}"),
            phone: None,
            role,
        })
        .await
        .expect("Failed to create user")
}

pub async fn create_student(db: &DatabaseConnection, tag: &str) -> users::Model {
    create_user(db, tag, UserRole::Student).await
}

pub async fn create_admin(db: &DatabaseConnection, tag: &str) -> users::Model {
    create_user(db, tag, UserRole::Admin).await
}

pub async fn create_course(
    db: &DatabaseConnection,
    code: &str,
    price: Decimal,
    max_capacity: i32,
) -> courses::Model {
    CourseRepository::new(db.clone())
        .create(CourseDraft {
            code: code.to_string(),
            name: format!("Course {code}"),
            description: None,
            duration_weeks: 8,
            level: CourseLevel::Basic,
            price,
            max_capacity,
        })
        .await
        .expect("Failed to create course")
}

/// Creates a period and moves it to `status` through the allowed transitions.
pub async fn create_period(
    db: &DatabaseConnection,
    course: &courses::Model,
    code: &str,
    capacity: i32,
    status: PeriodStatus,
) -> periods::Model {
    let repo = PeriodRepository::new(db.clone());
    let created = repo
        .create(PeriodDraft {
            course_id: course.id,
            code: code.to_string(),
            name: format!("Period {code}"),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            schedule: Some("Mon-Wed 18:00-21:00".to_string()),
            notes: None,
            capacity: Some(capacity),
            teacher_ids: vec![],
        })
        .await
        .expect("Failed to create period");

    let path: &[PeriodStatus] = match status {
        PeriodStatus::Planned => &[],
        PeriodStatus::InProgress => &[PeriodStatus::InProgress],
        PeriodStatus::Finished => &[PeriodStatus::InProgress, PeriodStatus::Finished],
        PeriodStatus::Cancelled => &[PeriodStatus::Cancelled],
    };

    let mut period = created.period;
    for step in path {
        period = repo
            .update_status(period.id, *step)
            .await
            .expect("Failed to change period status");
    }
    period
}

pub async fn reload_period(db: &DatabaseConnection, id: uuid::Uuid) -> periods::Model {
    PeriodRepository::new(db.clone())
        .get(id)
        .await
        .expect("Period should exist")
}
