#![allow(dead_code)]

use autocatalog::categories::{CategoryCreate, create_category};
use autocatalog::entities::category;
use autocatalog::migration::Migrator;
use autocatalog::vehicles::{VehicleCreate, VehicleDetail, create_vehicle};
use autocatalog::{AppState, Config, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    router(AppState::new(db, Config::with_admin_token(ADMIN_TOKEN)))
}

/// Minimal valid vehicle payload; merge extra fields with [`with_fields`].
pub fn vehicle_payload(brand: &str, model: &str, year: i32, price: f64) -> Value {
    json!({
        "brand": brand,
        "model": model,
        "year": year,
        "price": price,
        "description": format!("{brand} {model} in very good condition"),
    })
}

pub fn with_fields(mut payload: Value, extra: Value) -> Value {
    if let (Some(target), Some(source)) = (payload.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    payload
}

pub async fn seed_vehicle(db: &DatabaseConnection, payload: Value) -> VehicleDetail {
    let payload: VehicleCreate = serde_json::from_value(payload).expect("valid vehicle payload");
    create_vehicle(db, payload).await.expect("Failed to seed vehicle")
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> category::Model {
    let payload = CategoryCreate {
        name: name.to_string(),
        description: None,
        icon: None,
        position: 0,
    };
    create_category(db, payload).await.expect("Failed to seed category")
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn admin(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, method, uri, body, Some(ADMIN_TOKEN)).await
}

/// Brands of the listed vehicles, in response order.
pub fn brands(page: &Value) -> Vec<String> {
    page["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|v| v["brand"].as_str().unwrap().to_string())
        .collect()
}
