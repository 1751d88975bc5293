use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{admin, seed_vehicle, send, setup_test_app, setup_test_db, vehicle_payload};

#[tokio::test]
async fn test_create_inquiry_for_vehicle() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let corsa = seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/inquiries",
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "phone": "  ",
            "message": "Is the Corsa still available?",
            "vehicleId": corsa.vehicle.id
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["vehicleId"], json!(corsa.vehicle.id));
    assert!(body["phone"].is_null());
}

#[tokio::test]
async fn test_create_inquiry_validation() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/inquiries",
        Some(json!({"name": "A", "email": "nope", "message": "Hi"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        "POST",
        "/api/inquiries",
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Is this one still available?",
            "vehicleId": uuid::Uuid::new_v4()
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "vehicleId");
}

#[tokio::test]
async fn test_contact_form_uses_configured_address() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = send(
        &app,
        "POST",
        "/api/contact",
        Some(json!({"name": "Luis", "message": "Do you accept trade-ins?"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], autocatalog::config::DEFAULT_CONTACT_EMAIL);
    assert!(body["vehicleId"].is_null());
}

#[tokio::test]
async fn test_inbox_lists_newest_first_with_vehicle() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let corsa = seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    send(
        &app,
        "POST",
        "/api/contact",
        Some(json!({"name": "Luis", "message": "Do you accept trade-ins?"})),
        None,
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send(
        &app,
        "POST",
        "/api/inquiries",
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Is the Corsa still available?",
            "vehicleId": corsa.vehicle.id
        })),
        None,
    )
    .await;

    let (status, _) = send(&app, "GET", "/api/admin/inquiries", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = admin(&app, "GET", "/api/admin/inquiries", None).await;
    assert_eq!(status, StatusCode::OK);
    let inbox = body.as_array().unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0]["name"], "Ana");
    assert_eq!(inbox[0]["vehicle"], json!({"brand": "Opel", "model": "Corsa"}));
    assert!(inbox[1]["vehicle"].is_null());
}

#[tokio::test]
async fn test_update_inquiry_status() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (_, created) = send(
        &app,
        "POST",
        "/api/contact",
        Some(json!({"name": "Luis", "message": "Do you accept trade-ins?"})),
        None,
    )
    .await;
    let uri = format!("/api/admin/inquiries/{}", created["id"].as_str().unwrap());

    let (status, body) = admin(&app, "PATCH", &uri, Some(json!({"status": "contacted"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CONTACTED");

    let (status, _) = admin(&app, "PATCH", &uri, Some(json!({"status": "ARCHIVED"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = admin(
        &app,
        "PATCH",
        &format!("/api/admin/inquiries/{}", uuid::Uuid::new_v4()),
        Some(json!({"status": "SPAM"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_inquiry() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (_, created) = send(
        &app,
        "POST",
        "/api/contact",
        Some(json!({"name": "Luis", "message": "Do you accept trade-ins?"})),
        None,
    )
    .await;
    let uri = format!("/api/admin/inquiries/{}", created["id"].as_str().unwrap());

    let (status, _) = admin(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = admin(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_vehicle_keeps_inquiry() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let corsa = seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    send(
        &app,
        "POST",
        "/api/inquiries",
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Is the Corsa still available?",
            "vehicleId": corsa.vehicle.id
        })),
        None,
    )
    .await;
    let (status, _) = admin(
        &app,
        "DELETE",
        &format!("/api/admin/vehicles/{}", corsa.vehicle.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = admin(&app, "GET", "/api/admin/inquiries", None).await;
    let inbox = body.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0]["vehicleId"].is_null());
    assert!(inbox[0]["vehicle"].is_null());
}
