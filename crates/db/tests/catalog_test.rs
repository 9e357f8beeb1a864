//! Integration tests for courses and periods.

mod common;

use academy_core::auth::UserRole;
use academy_core::catalog::{CatalogError, CourseDraft, CourseLevel, PeriodDraft, PeriodStatus};
use academy_db::repositories::{CourseRepository, PeriodFilter, PeriodRepository};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{create_course, create_period, create_student, create_user, setup_db};

fn draft(course_id: Uuid, code: &str) -> PeriodDraft {
    PeriodDraft {
        course_id,
        code: code.to_string(),
        name: "Evening group".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        schedule: None,
        notes: None,
        capacity: None,
        teacher_ids: vec![],
    }
}

#[tokio::test]
async fn test_course_code_normalized_and_unique() {
    let db = setup_db().await;
    let repo = CourseRepository::new(db.clone());

    let course = create_course(&db, " bar-101 ", dec!(350), 20).await;
    assert_eq!(course.code, "BAR-101");

    let result = repo
        .create(CourseDraft {
            code: "BAR-101".to_string(),
            name: "Another".to_string(),
            description: None,
            duration_weeks: 4,
            level: CourseLevel::Advanced,
            price: dec!(100),
            max_capacity: 10,
        })
        .await;
    assert!(matches!(result, Err(CatalogError::DuplicateCode(code)) if code == "BAR-101"));
}

#[tokio::test]
async fn test_get_missing_course() {
    let db = setup_db().await;
    let id = Uuid::now_v7();
    let result = CourseRepository::new(db).get(id).await;
    assert!(matches!(result, Err(CatalogError::CourseNotFound(missing)) if missing == id));
}

#[tokio::test]
async fn test_period_defaults_to_course_capacity() {
    let db = setup_db().await;
    let course = create_course(&db, "BAR-101", dec!(350), 15).await;

    let created = PeriodRepository::new(db.clone())
        .create(draft(course.id, "bar-101-a"))
        .await
        .expect("Failed to create period");

    assert_eq!(created.period.code, "BAR-101-A");
    assert_eq!(created.period.capacity, 15);
    assert_eq!(created.period.seats_occupied, 0);
    assert_eq!(created.period.seats_available(), 15);
}

#[tokio::test]
async fn test_period_teachers_must_be_teachers() {
    let db = setup_db().await;
    let course = create_course(&db, "BAR-101", dec!(350), 15).await;
    let teacher = create_user(&db, "teacher", UserRole::Teacher).await;
    let student = create_student(&db, "student").await;
    let repo = PeriodRepository::new(db.clone());

    let created = repo
        .create(PeriodDraft {
            teacher_ids: vec![teacher.id],
            ..draft(course.id, "P-1")
        })
        .await
        .expect("Failed to create period");
    let loaded = repo.get_with_teachers(created.period.id).await.unwrap();
    assert_eq!(loaded.teacher_ids, vec![teacher.id]);

    let result = repo
        .create(PeriodDraft {
            teacher_ids: vec![student.id],
            ..draft(course.id, "P-2")
        })
        .await;
    assert!(matches!(result, Err(CatalogError::Validation(_))));
}

#[tokio::test]
async fn test_period_for_missing_course() {
    let db = setup_db().await;
    let result = PeriodRepository::new(db)
        .create(draft(Uuid::now_v7(), "P-1"))
        .await;
    assert!(matches!(result, Err(CatalogError::CourseNotFound(_))));
}

#[tokio::test]
async fn test_period_status_transitions() {
    let db = setup_db().await;
    let course = create_course(&db, "BAR-101", dec!(350), 15).await;
    let period = create_period(&db, &course, "P-1", 10, PeriodStatus::InProgress).await;
    let repo = PeriodRepository::new(db.clone());

    let result = repo.update_status(period.id, PeriodStatus::Planned).await;
    assert!(matches!(result, Err(CatalogError::InvalidTransition { .. })));

    let finished = repo
        .update_status(period.id, PeriodStatus::Finished)
        .await
        .unwrap();
    let status: PeriodStatus = finished.status.into();
    assert_eq!(status, PeriodStatus::Finished);
}

#[tokio::test]
async fn test_list_periods_filters() {
    let db = setup_db().await;
    let course_a = create_course(&db, "A", dec!(100), 10).await;
    let course_b = create_course(&db, "B", dec!(100), 10).await;
    create_period(&db, &course_a, "A-1", 5, PeriodStatus::InProgress).await;
    create_period(&db, &course_a, "A-2", 5, PeriodStatus::Planned).await;
    create_period(&db, &course_b, "B-1", 5, PeriodStatus::InProgress).await;
    let repo = PeriodRepository::new(db.clone());

    let of_a = repo
        .list(PeriodFilter {
            course_id: Some(course_a.id),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(of_a.len(), 2);

    let running = repo
        .list(PeriodFilter {
            course_id: None,
            status: Some(PeriodStatus::InProgress),
        })
        .await
        .unwrap();
    let mut codes: Vec<_> = running.into_iter().map(|p| p.code).collect();
    codes.sort();
    assert_eq!(codes, vec!["A-1", "B-1"]);
}
