//! HTTP tests for the catalog, cart checkout and enrollment management.

mod common;

use academy_core::auth::UserRole;
use axum::http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use common::{TestApp, decimal};

/// Creates a course and an in-progress period through the API.
async fn open_period(
    app: &TestApp,
    admin: &str,
    code: &str,
    price: &str,
    capacity: i32,
) -> (Value, Value) {
    let (status, course) = app
        .post(
            "/api/v1/courses",
            admin,
            json!({
                "code": code,
                "name": format!("Course {code}"),
                "duration_weeks": 8,
                "level": "basic",
                "price": price,
                "max_capacity": 30
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{course}");

    let (status, period) = app
        .post(
            "/api/v1/periods",
            admin,
            json!({
                "course_id": course["id"],
                "code": format!("{code}-P1"),
                "name": "Evening group",
                "start_date": "2025-03-01",
                "end_date": "2025-06-30",
                "capacity": capacity
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{period}");
    assert_eq!(period["status"], "planned");

    let uri = format!("/api/v1/periods/{}/status", period["id"].as_str().unwrap());
    let (status, period) = app.put(&uri, admin, json!({ "status": "in_progress" })).await;
    assert_eq!(status, StatusCode::OK);

    (course, period)
}

#[tokio::test]
async fn test_catalog_management_is_admin_only() {
    let app = TestApp::new().await;
    let (_, student) = app.user("ana", UserRole::Student).await;

    let (status, body) = app
        .post(
            "/api/v1/courses",
            &student,
            json!({
                "code": "BAR-101",
                "name": "Barista",
                "duration_weeks": 8,
                "level": "basic",
                "price": "350",
                "max_capacity": 20
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = app.get("/api/v1/courses", &student).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_cart_checkout_flow() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("root", UserRole::Admin).await;
    let (_, student) = app.user("ana", UserRole::Student).await;
    let (course, period) = open_period(&app, &admin, "BAR-101", "350", 5).await;

    let (status, cart) = app
        .post(
            "/api/v1/cart/items",
            &student,
            json!({ "course_id": course["id"], "period_id": period["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{cart}");
    assert_eq!(decimal(&cart["cart"]["total"]), dec!(350));

    let (status, result) = app
        .post("/api/v1/cart/checkout", &student, json!({ "payment_method": "card" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{result}");
    assert_eq!(result["cart"]["status"], "processed");
    assert_eq!(result["enrollments"].as_array().map(Vec::len), Some(1));
    assert_eq!(result["enrollments"][0]["payment_method"], "card");

    let uri = format!("/api/v1/periods/{}", period["id"].as_str().unwrap());
    let (_, period) = app.get(&uri, &student).await;
    assert_eq!(period["seats_occupied"], 1);
    assert_eq!(period["seats_available"], 4);

    let (status, mine) = app.get("/api/v1/enrollments/mine", &student).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .post("/api/v1/cart/checkout", &student, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EMPTY_CART");
}

#[tokio::test]
async fn test_teacher_cannot_use_cart() {
    let app = TestApp::new().await;
    let (_, teacher) = app.user("teo", UserRole::Teacher).await;

    let (status, _) = app.get("/api/v1/cart", &teacher).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_period_reports_capacity_exceeded() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("root", UserRole::Admin).await;
    let (ana, _) = app.user("ana", UserRole::Student).await;
    let (bruno, _) = app.user("bruno", UserRole::Student).await;
    let (_, period) = open_period(&app, &admin, "BAR-101", "350", 1).await;

    let (status, _) = app
        .post(
            "/api/v1/enrollments",
            &admin,
            json!({ "student_id": ana.id, "period_id": period["id"], "amount_paid": "350" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/v1/enrollments",
            &admin,
            json!({ "student_id": bruno.id, "period_id": period["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CAPACITY_EXCEEDED");
    assert!(body["message"].as_str().unwrap().contains("BAR-101-P1"));
}

#[tokio::test]
async fn test_admin_enrollment_and_payments() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("root", UserRole::Admin).await;
    let (ana, ana_token) = app.user("ana", UserRole::Student).await;
    let (_, bruno_token) = app.user("bruno", UserRole::Student).await;
    let (_, period) = open_period(&app, &admin, "BAR-101", "100", 5).await;

    let (status, enrollment) = app
        .post(
            "/api/v1/enrollments/admin",
            &admin,
            json!({ "student_id": ana.id, "period_id": period["id"], "discount": "10" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{enrollment}");
    assert_eq!(decimal(&enrollment["amount_paid"]), dec!(90));
    assert_eq!(enrollment["payment_method"], "cash");

    let id = enrollment["id"].as_str().unwrap().to_string();
    let payments = format!("/api/v1/enrollments/{id}/payments");

    let (status, _) = app
        .post(&payments, &bruno_token, json!({ "amount": "10" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .post(&payments, &ana_token, json!({ "amount": "10", "payment_method": "transfer" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{updated}");
    assert_eq!(decimal(&updated["amount_paid"]), dec!(100));

    let (status, details) = app.get(&format!("/api/v1/enrollments/{id}"), &ana_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["payments"].as_array().map(Vec::len), Some(1));

    let (status, page) = app
        .get("/api/v1/enrollments?status=active&per_page=10", &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);

    let (status, _) = app.get("/api/v1/enrollments", &ana_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/api/v1/enrollments/{id}"),
            &admin,
            json!({ "status": "suspended" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "suspended");

    let (status, _) = app.delete(&format!("/api/v1/enrollments/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/v1/periods/{}", period["id"].as_str().unwrap());
    let (_, period) = app.get(&uri, &admin).await;
    assert_eq!(period["seats_occupied"], 0);
}

#[tokio::test]
async fn test_oversized_payment_is_rejected() {
    let app = TestApp::new().await;
    let (_, admin) = app.user("root", UserRole::Admin).await;
    let (ana, ana_token) = app.user("ana", UserRole::Student).await;
    let (_, period) = open_period(&app, &admin, "BAR-101", "100", 5).await;

    let (status, enrollment) = app
        .post(
            "/api/v1/enrollments/admin",
            &admin,
            json!({ "student_id": ana.id, "period_id": period["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{enrollment}");
    let payments = format!(
        "/api/v1/enrollments/{}/payments",
        enrollment["id"].as_str().unwrap()
    );

    for amount in ["79228162514264337593543950335", "10000000000"] {
        let (status, body) = app
            .post(&payments, &ana_token, json!({ "amount": amount }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body["error"], "INVALID_AMOUNT");
    }

    let (_, details) = app
        .get(
            &format!("/api/v1/enrollments/{}", enrollment["id"].as_str().unwrap()),
            &ana_token,
        )
        .await;
    assert_eq!(decimal(&details["enrollment"]["amount_paid"]), dec!(100));
    assert_eq!(details["payments"].as_array().map(Vec::len), Some(0));
}
