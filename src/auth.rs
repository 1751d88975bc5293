//! Admin guard.
//!
//! Credential handling is deliberately thin: a single shared bearer token taken
//! from configuration. What the rest of the crate depends on is only the
//! [`Identity`] the guard leaves in the request extensions.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::errors::ApiError;
use crate::filtering::Audience;
use crate::routes::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
}

impl Identity {
    /// Only administrators may see hidden vehicles or lift the status filter.
    #[must_use]
    pub const fn audience(&self) -> Audience {
        match self.role {
            Role::Admin => Audience::Admin,
        }
    }
}

/// Reject requests without `Authorization: Bearer <ADMIN_API_TOKEN>`, and
/// attach an [`Identity`] to those that carry it.
///
/// # Errors
///
/// [`ApiError::Unauthorized`] on a missing, malformed or wrong token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    if !tokens_match(token.as_bytes(), state.config.admin_token.as_bytes()) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request with invalid token");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    request.extensions_mut().insert(Identity {
        subject: "admin".to_string(),
        role: Role::Admin,
    });
    Ok(next.run(request).await)
}

/// Comparison time depends only on the lengths, not on where the bytes differ.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
