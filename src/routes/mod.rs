//! HTTP surface.
//!
//! Public routes live under `/api`, admin routes under `/api/admin` behind
//! [`require_admin`]. Handlers are thin: extract, call the domain function,
//! wrap the result. Every handler is documented with `#[utoipa::path]` and
//! registered through [`OpenApiRouter`], which assembles the schema document
//! served at `/api/openapi.json`.

mod catalog;
mod categories;
mod health;
mod inquiries;
mod vehicles;

use std::sync::Arc;

use axum::{Json, Router, middleware, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::require_admin;
use crate::config::Config;
use crate::openapi::ApiDoc;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::health))
        .routes(routes!(catalog::list_vehicles))
        .routes(routes!(catalog::list_brands))
        .routes(routes!(vehicles::get_by_slug))
        .routes(routes!(categories::list_categories))
        .routes(routes!(inquiries::create_inquiry))
        .routes(routes!(inquiries::submit_contact))
}

fn admin_routes(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(catalog::list_admin_vehicles, vehicles::create_vehicle))
        .routes(routes!(
            vehicles::get_vehicle,
            vehicles::update_vehicle,
            vehicles::delete_vehicle
        ))
        .routes(routes!(vehicles::dashboard_stats))
        .routes(routes!(categories::create_category))
        .routes(routes!(inquiries::list_inquiries))
        .routes(routes!(
            inquiries::update_inquiry_status,
            inquiries::delete_inquiry
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", public_routes())
        .nest("/api/admin", admin_routes(&state))
        .with_state(state)
        .split_for_parts();

    router
        .route("/api/openapi.json", get(move || async move { Json(api) }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
