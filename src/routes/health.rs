use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    /// `ok` or `degraded`
    pub status: String,
    /// `up` or `down`
    pub database: String,
}

impl HealthStatus {
    fn new(status: &str, database: &str) -> Self {
        Self {
            status: status.to_string(),
            database: database.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = StatusCode::OK, description = "Service and database are reachable", body = HealthStatus),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "Database is unreachable", body = HealthStatus)
    ),
    operation_id = "health",
    summary = "Liveness and database reachability",
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::new("ok", "up"))),
        Err(err) => {
            tracing::error!(error = %err, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus::new("degraded", "down")),
            )
        }
    }
}
