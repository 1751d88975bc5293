use axum::{Json, extract::State, http::StatusCode};

use super::AppState;
use crate::categories::{self as taxonomy, CategoryCreate, CategoryWithCount};
use crate::entities::category;
use crate::errors::{ApiError, ErrorResponse};

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = StatusCode::OK, description = "Categories with vehicle counts", body = [CategoryWithCount])
    ),
    operation_id = "list_categories",
    summary = "List categories",
    tag = "catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, ApiError> {
    Ok(Json(taxonomy::list_categories(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryCreate,
    responses(
        (status = StatusCode::CREATED, description = "Category created", body = category::Model),
        (status = StatusCode::CONFLICT, description = "Slug already taken", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    ),
    operation_id = "create_category",
    summary = "Add a category",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<category::Model>), ApiError> {
    let created = taxonomy::create_category(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
