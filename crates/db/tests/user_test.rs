//! Integration tests for the user repository.

mod common;

use academy_core::auth::UserRole;
use academy_db::UserRepository;
use academy_db::entities::sea_orm_active_enums;
use academy_db::repositories::NewUser;

use common::{create_student, setup_db};

#[tokio::test]
async fn test_user_create_and_find_by_id() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());

    let user = create_student(&db, "ana").await;
    assert_eq!(user.email, "ana@academy.test");
    assert_eq!(user.role, sea_orm_active_enums::UserRole::Student);
    assert!(user.is_active);

    let found = repo
        .find_by_id(user.id)
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(found.id, user.id);
    assert_eq!(found.document_number, "DOC-ana");
}

#[tokio::test]
async fn test_user_find_by_email_is_case_insensitive() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let user = create_student(&db, "bruno").await;

    let found = repo
        .find_by_email("  BRUNO@Academy.Test ")
        .await
        .expect("Failed to find user")
        .expect("User should exist");
    assert_eq!(found.id, user.id);

    assert!(
        repo.find_by_email("nobody@academy.test")
            .await
            .expect("Query should succeed")
            .is_none()
    );
}

#[tokio::test]
async fn test_email_and_document_exist() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    create_student(&db, "carla").await;

    assert!(repo.email_exists("carla@academy.test").await.unwrap());
    assert!(!repo.email_exists("other@academy.test").await.unwrap());
    assert!(repo.document_exists("DOC-carla").await.unwrap());
    assert!(!repo.document_exists("DOC-other").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_document_number_rejected() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    create_student(&db, "diego").await;

    let result = repo
        .create(NewUser {
            email: "diego2@academy.test".to_string(),
            password_hash: "$argon2id$test_hash".to_string(),
            first_name: "Diego".to_string(),
            last_name: "Copy".to_string(),
            document_number: "DOC-diego".to_string(),
            phone: None,
            role: UserRole::Student,
        })
        .await;

    assert!(result.is_err());
}
