//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. The error decides its own
//! status code, logs whatever is internal, and sends a sanitized JSON body:
//!
//! ```json
//! { "error": "Validation failed", "details": [{"field": "year", "message": "..."}] }
//! { "error": "The vehicle catalog is temporarily unavailable", "code": "catalog_unavailable" }
//! ```
//!
//! Database errors, timeouts and other internal details are logged through
//! `tracing` and never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::validation::{ValidationError, ValidationErrors};

/// Machine-readable code sent with a catalog outage.
pub const CATALOG_UNAVAILABLE: &str = "catalog_unavailable";

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource type (e.g. "Vehicle")
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request
    BadRequest { message: String },

    /// 401 Unauthorized
    Unauthorized { message: String },

    /// 409 Conflict (duplicate slug and the like)
    Conflict { message: String },

    /// 422 Unprocessable Entity
    ValidationFailed { errors: Vec<ValidationError> },

    /// 503 Service Unavailable: storage cannot be reached or is too slow.
    Unavailable {
        message: String,
        code: &'static str,
        /// Logged, not sent
        internal: String,
    },

    /// 500 Internal Server Error, details logged
    Database { message: String, internal: DbErr },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<ValidationError>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// A single-field 422.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation_failed(vec![ValidationError::new(field, message)])
    }

    /// Create a 500 from a database error. The details are logged, not sent.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::ValidationFailed { errors } => match errors.as_slice() {
                [single] => single.to_string(),
                _ => "Validation failed".to_string(),
            },
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Conflict { message }
            | Self::Unavailable { message, .. }
            | Self::Database { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Unavailable { internal, code, .. } => {
                tracing::warn!(code, details = %internal, "Service unavailable");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors),
                code: None,
            },
            Self::Unavailable { message, code, .. } => ErrorResponse {
                error: message,
                details: None,
                code: Some(code.to_string()),
            },
            other => ErrorResponse {
                error: other.user_message(),
                details: None,
                code: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// - `RecordNotFound` → 404
/// - unique constraint violation → 409
/// - everything else → 500, details logged only
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(msg) = &err {
            let resource = msg.split_whitespace().next().unwrap_or("Resource");
            return Self::NotFound {
                resource: resource.to_string(),
                id: None,
            };
        }
        if let Some(SqlErr::UniqueConstraintViolation(details)) = err.sql_err() {
            tracing::debug!(details = %details, "Unique constraint violated");
            return Self::conflict("A record with the same unique value already exists");
        }
        Self::database(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::Unavailable {
            message: "The vehicle catalog is temporarily unavailable. Check that the database is configured and reachable, then retry.".to_string(),
            code: CATALOG_UNAVAILABLE,
            internal: format!("{err}"),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors.errors().to_vec())
    }
}
