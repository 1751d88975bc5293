//! # autocatalog
//!
//! Back end of a used-car dealership: a filterable, paginated public catalog,
//! vehicle detail pages, customer inquiries, and an admin surface for the
//! inventory and the inquiry inbox.
//!
//! The catalog path is the core of the crate:
//!
//! ```text
//! CatalogParams --VehicleFilter::parse--> VehicleFilter
//!               --build_condition------> sea_orm::Condition
//!               --fetch_page-----------> PageEnvelope<VehicleSummary>
//! ```
//!
//! Parsing never fails: values it cannot interpret are dropped. Storage
//! failures are never hidden behind an empty page.

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod entities;
pub mod errors;
pub mod filtering;
pub mod inquiries;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod slug;
pub mod traits;
pub mod validation;
pub mod vehicles;

pub use config::Config;
pub use errors::ApiError;
pub use routes::{AppState, router};
