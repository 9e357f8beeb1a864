//! Integration tests for the cart and checkout.

mod common;

use academy_core::auth::UserRole;
use academy_core::catalog::PeriodStatus;
use academy_core::enrollment::{EnrollmentError, PaymentMethod};
use academy_db::entities::{enrollments, sea_orm_active_enums as db_enums};
use academy_db::repositories::{CartRepository, EnrollInput, EnrollmentRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::{create_course, create_period, create_student, create_user, reload_period, setup_db};

#[tokio::test]
async fn test_cart_created_on_first_access() {
    let db = setup_db().await;
    let student = create_student(&db, "ana").await;
    let repo = CartRepository::new(db.clone());

    let first = repo.get_or_create(student.id).await.unwrap();
    assert_eq!(first.cart.status, db_enums::CartStatus::Active);
    assert_eq!(first.cart.total, Decimal::ZERO);
    assert!(first.items.is_empty());

    let second = repo.get_or_create(student.id).await.unwrap();
    assert_eq!(first.cart.id, second.cart.id);
}

#[tokio::test]
async fn test_cart_only_for_students() {
    let db = setup_db().await;
    let teacher = create_user(&db, "teo", UserRole::Teacher).await;
    let repo = CartRepository::new(db.clone());

    let result = repo.get_or_create(teacher.id).await;
    assert!(matches!(result, Err(EnrollmentError::InvalidRole(_))));

    let result = repo.get_or_create(Uuid::now_v7()).await;
    assert!(matches!(result, Err(EnrollmentError::StudentNotFound(_))));
}

#[tokio::test]
async fn test_add_item_snapshots_price() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(350), 10).await;
    let coc = create_course(&db, "COC-201", dec!(120.5), 10).await;
    let bar_p = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let coc_p = create_period(&db, &coc, "COC-P1", 5, PeriodStatus::InProgress).await;
    let student = create_student(&db, "ana").await;
    let repo = CartRepository::new(db.clone());

    repo.add_item(student.id, bar.id, bar_p.id).await.unwrap();
    let view = repo.add_item(student.id, coc.id, coc_p.id).await.unwrap();

    assert_eq!(view.items.len(), 2);
    assert_eq!(view.items[0].price, dec!(350));
    assert_eq!(view.items[1].price, dec!(120.5));
    assert_eq!(view.cart.total, dec!(470.5));

    // Adding to the cart does not take a seat.
    assert_eq!(reload_period(&db, bar_p.id).await.seats_occupied, 0);
}

#[tokio::test]
async fn test_add_item_rules() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(350), 10).await;
    let coc = create_course(&db, "COC-201", dec!(120), 10).await;
    let running = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let planned = create_period(&db, &bar, "BAR-P2", 5, PeriodStatus::Planned).await;
    let student = create_student(&db, "ana").await;
    let repo = CartRepository::new(db.clone());

    let result = repo.add_item(student.id, bar.id, planned.id).await;
    assert!(matches!(
        result,
        Err(EnrollmentError::NotAvailable {
            status: PeriodStatus::Planned,
            ..
        })
    ));

    let result = repo.add_item(student.id, coc.id, running.id).await;
    assert!(matches!(result, Err(EnrollmentError::PeriodCourseMismatch { .. })));

    let result = repo.add_item(student.id, bar.id, Uuid::now_v7()).await;
    assert!(matches!(result, Err(EnrollmentError::PeriodNotFound(_))));

    repo.add_item(student.id, bar.id, running.id).await.unwrap();
    let result = repo.add_item(student.id, bar.id, running.id).await;
    assert!(matches!(result, Err(EnrollmentError::ItemAlreadyInCart)));

    let view = repo.get_or_create(student.id).await.unwrap();
    assert_eq!(view.items.len(), 1);
}

#[tokio::test]
async fn test_add_item_when_already_enrolled() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(350), 10).await;
    let period = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let student = create_student(&db, "ana").await;

    EnrollmentRepository::new(db.clone())
        .enroll(EnrollInput {
            student_id: student.id,
            period_id: period.id,
            course_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: dec!(350),
            discount: Decimal::ZERO,
            notes: None,
            documents: vec![],
        })
        .await
        .unwrap();

    let result = CartRepository::new(db.clone())
        .add_item(student.id, bar.id, period.id)
        .await;
    assert!(matches!(result, Err(EnrollmentError::DuplicateEnrollment)));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(300), 10).await;
    let p1 = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let p2 = create_period(&db, &bar, "BAR-P2", 5, PeriodStatus::InProgress).await;
    let student = create_student(&db, "ana").await;
    let stranger = create_student(&db, "bruno").await;
    let repo = CartRepository::new(db.clone());

    let result = repo.remove_item(stranger.id, Uuid::now_v7()).await;
    assert!(matches!(result, Err(EnrollmentError::CartNotFound)));
    let result = repo.clear(stranger.id).await;
    assert!(matches!(result, Err(EnrollmentError::CartNotFound)));

    repo.add_item(student.id, bar.id, p1.id).await.unwrap();
    let view = repo.add_item(student.id, bar.id, p2.id).await.unwrap();
    assert_eq!(view.cart.total, dec!(600));

    let first_item = view.items[0].id;
    let view = repo.remove_item(student.id, first_item).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.cart.total, dec!(300));

    let result = repo.remove_item(student.id, first_item).await;
    assert!(matches!(result, Err(EnrollmentError::CartItemNotFound(id)) if id == first_item));

    let view = repo.clear(student.id).await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.cart.total, Decimal::ZERO);
}

#[tokio::test]
async fn test_checkout_enrolls_every_item() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(350), 10).await;
    let coc = create_course(&db, "COC-201", dec!(120), 10).await;
    let bar_p = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let coc_p = create_period(&db, &coc, "COC-P1", 5, PeriodStatus::InProgress).await;
    let student = create_student(&db, "ana").await;
    let repo = CartRepository::new(db.clone());

    repo.add_item(student.id, bar.id, bar_p.id).await.unwrap();
    repo.add_item(student.id, coc.id, coc_p.id).await.unwrap();

    let result = repo
        .checkout(student.id, PaymentMethod::Card)
        .await
        .expect("Checkout should succeed");

    assert_eq!(result.enrollments.len(), 2);
    assert_eq!(result.enrollments[0].period_id, bar_p.id);
    assert_eq!(result.enrollments[0].amount_paid, dec!(350));
    assert_eq!(result.enrollments[1].amount_paid, dec!(120));
    assert!(
        result
            .enrollments
            .iter()
            .all(|e| e.payment_method == db_enums::PaymentMethod::Card)
    );
    assert_eq!(result.cart.status, db_enums::CartStatus::Processed);
    assert_eq!(result.cart.total, Decimal::ZERO);

    assert_eq!(reload_period(&db, bar_p.id).await.seats_occupied, 1);
    assert_eq!(reload_period(&db, coc_p.id).await.seats_occupied, 1);

    let view = repo.get_or_create(student.id).await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.cart.status, db_enums::CartStatus::Processed);

    // Adding again reopens the cart.
    let other = create_period(&db, &bar, "BAR-P2", 5, PeriodStatus::InProgress).await;
    let view = repo.add_item(student.id, bar.id, other.id).await.unwrap();
    assert_eq!(view.cart.status, db_enums::CartStatus::Active);
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let db = setup_db().await;
    let student = create_student(&db, "ana").await;
    let repo = CartRepository::new(db.clone());

    let result = repo.checkout(student.id, PaymentMethod::Cash).await;
    assert!(matches!(result, Err(EnrollmentError::CartNotFound)));

    repo.get_or_create(student.id).await.unwrap();
    let result = repo.checkout(student.id, PaymentMethod::Cash).await;
    assert!(matches!(result, Err(EnrollmentError::EmptyCart)));
}

#[tokio::test]
async fn test_checkout_rolls_back_when_a_period_fills() {
    let db = setup_db().await;
    let bar = create_course(&db, "BAR-101", dec!(350), 10).await;
    let coc = create_course(&db, "COC-201", dec!(120), 10).await;
    let bar_p = create_period(&db, &bar, "BAR-P1", 5, PeriodStatus::InProgress).await;
    let coc_p = create_period(&db, &coc, "COC-P1", 1, PeriodStatus::InProgress).await;
    let student = create_student(&db, "ana").await;
    let rival = create_student(&db, "bruno").await;
    let repo = CartRepository::new(db.clone());

    repo.add_item(student.id, bar.id, bar_p.id).await.unwrap();
    repo.add_item(student.id, coc.id, coc_p.id).await.unwrap();

    // Someone else takes the last seat before checkout.
    EnrollmentRepository::new(db.clone())
        .enroll(EnrollInput {
            student_id: rival.id,
            period_id: coc_p.id,
            course_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: dec!(120),
            discount: Decimal::ZERO,
            notes: None,
            documents: vec![],
        })
        .await
        .unwrap();

    let result = repo.checkout(student.id, PaymentMethod::Cash).await;
    assert!(
        matches!(result, Err(EnrollmentError::CapacityExceeded { ref period }) if period == "COC-P1")
    );

    assert_eq!(reload_period(&db, bar_p.id).await.seats_occupied, 0);
    assert_eq!(reload_period(&db, coc_p.id).await.seats_occupied, 1);

    let mine = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(mine, 0);

    let view = repo.get_or_create(student.id).await.unwrap();
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.cart.status, db_enums::CartStatus::Active);
}
