//! Base OpenAPI document.
//!
//! Paths and most schemas are collected from the `#[utoipa::path]` handlers as
//! they are registered on the router; this only carries the metadata and the
//! bearer scheme the admin routes refer to.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::errors::ErrorResponse;
use crate::validation::ValidationError;

pub const BEARER_SCHEME: &str = "bearer";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Value of ADMIN_API_TOKEN"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "autocatalog",
        description = "Used-car dealership catalog: public browsing, inquiries and inventory administration."
    ),
    components(schemas(ErrorResponse, ValidationError)),
    tags(
        (name = "catalog", description = "Public vehicle browsing"),
        (name = "inquiries", description = "Customer contact"),
        (name = "admin", description = "Inventory and inbox management, bearer token required"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
