//! Customer inquiries: the per-vehicle contact form, the general contact form
//! and their admin inbox.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{InquiryStatus, inquiry, vehicle};
use crate::errors::ApiError;
use crate::filtering::parser::parse_enum;
use crate::validation::{Validatable, ValidationErrors, validators};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_MESSAGE_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub vehicle_id: Option<Uuid>,
}

/// General contact form. Stored as an inquiry without a vehicle, sent from the
/// configured contact address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct InquiryStatusUpdate {
    /// One of `PENDING`, `CONTACTED`, `RESOLVED`, `SPAM`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLabel {
    pub brand: String,
    pub model: String,
}

/// Inbox row: the inquiry plus the vehicle it is about, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryWithVehicle {
    #[serde(flatten)]
    pub inquiry: inquiry::Model,
    pub vehicle: Option<VehicleLabel>,
}

fn check_name_and_message(errors: &mut ValidationErrors, name: &str, message: &str) {
    errors.check(validators::validate_length("name", name, Some(MIN_NAME_LENGTH), None));
    errors.check(validators::validate_length(
        "message",
        message,
        Some(MIN_MESSAGE_LENGTH),
        None,
    ));
}

impl Validatable for InquiryCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name_and_message(&mut errors, &self.name, &self.message);
        errors.check(validators::validate_email("email", &self.email));
        errors.result()
    }
}

impl Validatable for ContactMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name_and_message(&mut errors, &self.name, &self.message);
        errors.result()
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::not_found("Inquiry", Some(id.to_string()))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn insert_inquiry(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    phone: Option<String>,
    message: &str,
    vehicle_id: Option<Uuid>,
) -> Result<inquiry::Model, ApiError> {
    let created = inquiry::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email.trim().to_string()),
        phone: Set(blank_to_none(phone)),
        message: Set(message.trim().to_string()),
        vehicle_id: Set(vehicle_id),
        status: Set(InquiryStatus::Pending),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    tracing::info!(
        inquiry_id = %created.id,
        vehicle_id = ?created.vehicle_id,
        "Inquiry received"
    );
    Ok(created)
}

/// # Errors
///
/// 422 on invalid fields or a vehicle id that does not exist.
pub async fn create_inquiry(
    db: &DatabaseConnection,
    payload: InquiryCreate,
) -> Result<inquiry::Model, ApiError> {
    payload.validate()?;

    if let Some(vehicle_id) = payload.vehicle_id
        && vehicle::Entity::find_by_id(vehicle_id).one(db).await?.is_none()
    {
        return Err(ApiError::invalid_field("vehicleId", "Unknown vehicle"));
    }

    insert_inquiry(
        db,
        &payload.name,
        &payload.email,
        payload.phone,
        &payload.message,
        payload.vehicle_id,
    )
    .await
}

/// # Errors
///
/// 422 on invalid fields.
pub async fn submit_contact(
    db: &DatabaseConnection,
    payload: ContactMessage,
    contact_email: &str,
) -> Result<inquiry::Model, ApiError> {
    payload.validate()?;
    insert_inquiry(db, &payload.name, contact_email, None, &payload.message, None).await
}

/// Inbox, newest first.
///
/// # Errors
///
/// Propagates database errors.
pub async fn list_inquiries(db: &DatabaseConnection) -> Result<Vec<InquiryWithVehicle>, ApiError> {
    let rows = inquiry::Entity::find()
        .find_also_related(vehicle::Entity)
        .order_by_desc(inquiry::Column::CreatedAt)
        .order_by_asc(inquiry::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(inquiry, vehicle)| InquiryWithVehicle {
            inquiry,
            vehicle: vehicle.map(|v| VehicleLabel {
                brand: v.brand,
                model: v.model,
            }),
        })
        .collect())
}

/// # Errors
///
/// 400 on an unknown status, 404 when the inquiry does not exist.
pub async fn update_inquiry_status(
    db: &DatabaseConnection,
    id: Uuid,
    payload: InquiryStatusUpdate,
) -> Result<inquiry::Model, ApiError> {
    let status: InquiryStatus = parse_enum(Some(payload.status.as_str())).ok_or_else(|| {
        ApiError::bad_request(format!("Invalid inquiry status '{}'", payload.status))
    })?;

    let existing = inquiry::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut active = existing.into_active_model();
    active.status = Set(status);
    let updated = active.update(db).await?;

    tracing::info!(inquiry_id = %id, status = ?status, "Inquiry status changed");
    Ok(updated)
}

/// # Errors
///
/// 404 when the inquiry does not exist.
pub async fn delete_inquiry(db: &DatabaseConnection, id: Uuid) -> Result<(), ApiError> {
    let result = inquiry::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(not_found(id));
    }
    tracing::info!(inquiry_id = %id, "Inquiry deleted");
    Ok(())
}
