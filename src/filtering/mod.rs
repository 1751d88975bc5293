//! Catalog query pipeline: raw parameters to a typed filter, the filter to a
//! storage predicate, plus the fixed catalog ordering.
//!
//! ```text
//! CatalogParams --parse--> VehicleFilter --build_condition--> Condition
//! ```
//!
//! Everything here is pure and synchronous. I/O lives in [`crate::catalog`].

pub mod conditions;
pub mod parser;
pub mod search;
pub mod sort;

pub use conditions::{BuildOptions, SEARCH_COLUMNS, build_condition};
pub use parser::{ANY_STATUS, Audience, StatusFilter, VehicleFilter};
pub use search::{MAX_SEARCH_QUERY_LENGTH, build_like_condition, build_search_condition};
pub use sort::{apply_order, catalog_order};
