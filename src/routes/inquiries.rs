use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::AppState;
use crate::entities::inquiry;
use crate::errors::{ApiError, ErrorResponse};
use crate::inquiries::{self as inbox, ContactMessage, InquiryCreate, InquiryStatusUpdate, InquiryWithVehicle};

#[utoipa::path(
    post,
    path = "/inquiries",
    request_body = InquiryCreate,
    responses(
        (status = StatusCode::CREATED, description = "Inquiry received", body = inquiry::Model),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    ),
    operation_id = "create_inquiry",
    summary = "Ask about a vehicle",
    tag = "inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(payload): Json<InquiryCreate>,
) -> Result<(StatusCode, Json<inquiry::Model>), ApiError> {
    let created = inbox::create_inquiry(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactMessage,
    responses(
        (status = StatusCode::CREATED, description = "Message received", body = inquiry::Model),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    ),
    operation_id = "submit_contact",
    summary = "General contact form",
    tag = "inquiries"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactMessage>,
) -> Result<(StatusCode, Json<inquiry::Model>), ApiError> {
    let created = inbox::submit_contact(&state.db, payload, &state.config.contact_email).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/inquiries",
    responses(
        (status = StatusCode::OK, description = "All inquiries, newest first", body = [InquiryWithVehicle]),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse)
    ),
    operation_id = "list_inquiries",
    summary = "Inquiry inbox",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
) -> Result<Json<Vec<InquiryWithVehicle>>, ApiError> {
    Ok(Json(inbox::list_inquiries(&state.db).await?))
}

#[utoipa::path(
    patch,
    path = "/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry id")),
    request_body = InquiryStatusUpdate,
    responses(
        (status = StatusCode::OK, description = "Status changed", body = inquiry::Model),
        (status = StatusCode::BAD_REQUEST, description = "Unknown status", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Inquiry not found", body = ErrorResponse)
    ),
    operation_id = "update_inquiry_status",
    summary = "Change an inquiry's status",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn update_inquiry_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InquiryStatusUpdate>,
) -> Result<Json<inquiry::Model>, ApiError> {
    Ok(Json(inbox::update_inquiry_status(&state.db, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry id")),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Inquiry deleted"),
        (status = StatusCode::NOT_FOUND, description = "Inquiry not found", body = ErrorResponse)
    ),
    operation_id = "delete_inquiry",
    summary = "Delete an inquiry",
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    inbox::delete_inquiry(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
