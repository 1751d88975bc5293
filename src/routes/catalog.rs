use axum::{
    Json,
    extract::{Query, State},
};

use super::AppState;
use crate::auth::Identity;
use crate::catalog::{self as listing, VehicleSummary};
use crate::errors::{ApiError, ErrorResponse};
use crate::filtering::{Audience, VehicleFilter};
use crate::models::CatalogParams;
use crate::pagination::PageEnvelope;

/// Raw query pairs. Extracting `CatalogParams` directly would reject repeated keys.
type QueryPairs = Query<Vec<(String, String)>>;

async fn list_for(
    state: &AppState,
    pairs: Vec<(String, String)>,
    audience: Audience,
) -> Result<Json<PageEnvelope<VehicleSummary>>, ApiError> {
    let filter = VehicleFilter::parse(&CatalogParams::from_pairs(pairs), audience);
    let page = listing::fetch_page(
        &state.db,
        &filter,
        audience,
        state.config.catalog_query_timeout,
    )
    .await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/vehicles",
    params(CatalogParams),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of publicly listed vehicles", body = PageEnvelope<VehicleSummary>),
        (status = axum::http::StatusCode::SERVICE_UNAVAILABLE, description = "Catalog storage unavailable", body = ErrorResponse)
    ),
    operation_id = "list_vehicles",
    summary = "Browse the catalog",
    description = "Only visible vehicles are listed, available ones unless another status is requested. \
                   Unrecognised or malformed filter values are ignored rather than rejected.",
    tag = "catalog"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<PageEnvelope<VehicleSummary>>, ApiError> {
    list_for(&state, pairs, Audience::Public).await
}

#[utoipa::path(
    get,
    path = "/vehicles",
    params(CatalogParams),
    responses(
        (status = axum::http::StatusCode::OK, description = "One page of vehicles, hidden ones included", body = PageEnvelope<VehicleSummary>),
        (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = axum::http::StatusCode::SERVICE_UNAVAILABLE, description = "Catalog storage unavailable", body = ErrorResponse)
    ),
    operation_id = "list_admin_vehicles",
    summary = "Inventory listing",
    description = "Same filters as the public catalog. `status=ALL` lists every status.",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn list_admin_vehicles(
    State(state): State<AppState>,
    identity: Identity,
    Query(pairs): QueryPairs,
) -> Result<Json<PageEnvelope<VehicleSummary>>, ApiError> {
    list_for(&state, pairs, identity.audience()).await
}

#[utoipa::path(
    get,
    path = "/vehicles/brands",
    responses(
        (status = axum::http::StatusCode::OK, description = "Distinct brands of available vehicles", body = [String]),
        (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse)
    ),
    operation_id = "list_brands",
    summary = "Brands for the filter menu",
    tag = "catalog"
)]
pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(listing::list_brands(&state.db).await?))
}
