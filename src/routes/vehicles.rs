use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::AppState;
use crate::errors::{ApiError, ErrorResponse};
use crate::vehicles::{self as inventory, DashboardStats, VehicleCreate, VehicleDetail, VehiclePage, VehicleUpdate};

#[utoipa::path(
    get,
    path = "/vehicles/slug/{slug}",
    params(("slug" = String, Path, description = "Public vehicle slug")),
    responses(
        (status = StatusCode::OK, description = "Vehicle detail with similar vehicles", body = VehiclePage),
        (status = StatusCode::NOT_FOUND, description = "No visible vehicle with this slug", body = ErrorResponse)
    ),
    operation_id = "get_vehicle_by_slug",
    summary = "Public vehicle page",
    tag = "catalog"
)]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<VehiclePage>, ApiError> {
    Ok(Json(inventory::get_public_vehicle(&state.db, &slug).await?))
}

#[utoipa::path(
    post,
    path = "/vehicles",
    request_body = VehicleCreate,
    responses(
        (status = StatusCode::CREATED, description = "Vehicle created", body = VehicleDetail),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    ),
    operation_id = "create_vehicle",
    summary = "Add a vehicle",
    description = "The slug is derived from brand, model and year. A timestamp suffix is added when it is taken.",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<VehicleCreate>,
) -> Result<(StatusCode, Json<VehicleDetail>), ApiError> {
    let created = inventory::create_vehicle(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    responses(
        (status = StatusCode::OK, description = "The requested vehicle", body = VehicleDetail),
        (status = StatusCode::NOT_FOUND, description = "Vehicle not found", body = ErrorResponse)
    ),
    operation_id = "get_vehicle",
    summary = "Get one vehicle",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetail>, ApiError> {
    Ok(Json(inventory::get_vehicle(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    request_body = VehicleUpdate,
    responses(
        (status = StatusCode::OK, description = "Vehicle updated", body = VehicleDetail),
        (status = StatusCode::NOT_FOUND, description = "Vehicle not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    ),
    operation_id = "update_vehicle",
    summary = "Update a vehicle",
    description = "Absent fields are kept. A supplied `images` list replaces the gallery.",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehicleUpdate>,
) -> Result<Json<VehicleDetail>, ApiError> {
    Ok(Json(inventory::update_vehicle(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Vehicle deleted"),
        (status = StatusCode::NOT_FOUND, description = "Vehicle not found", body = ErrorResponse)
    ),
    operation_id = "delete_vehicle",
    summary = "Delete a vehicle",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    inventory::delete_vehicle(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = StatusCode::OK, description = "Inventory figures", body = DashboardStats),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse)
    ),
    operation_id = "dashboard_stats",
    summary = "Dashboard figures",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(inventory::dashboard_stats(&state.db).await?))
}
