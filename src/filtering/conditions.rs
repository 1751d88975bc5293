use sea_orm::{ColumnTrait, Condition, sea_query::Expr};
use uuid::Uuid;

use super::parser::{Audience, StatusFilter, VehicleFilter};
use super::search::{build_like_condition, build_search_condition};
use crate::entities::vehicle;

/// Columns covered by the free-text `search` parameter.
pub const SEARCH_COLUMNS: [vehicle::Column; 3] = [
    vehicle::Column::Brand,
    vehicle::Column::Model,
    vehicle::Column::Description,
];

/// Switches that are not part of the user's query but of who is asking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Also match vehicles hidden from the public catalog.
    pub include_hidden: bool,
}

impl BuildOptions {
    #[must_use]
    pub const fn for_audience(audience: Audience) -> Self {
        Self {
            include_hidden: matches!(audience, Audience::Admin),
        }
    }
}

/// Translate a parsed filter into a single AND-ed storage predicate.
///
/// Pure: no I/O and no error path. Every set field contributes exactly one
/// clause; the free-text search contributes one OR group.
#[must_use]
pub fn build_condition(filter: &VehicleFilter, options: &BuildOptions) -> Condition {
    let mut condition = Condition::all();

    if !options.include_hidden {
        condition = condition.add(vehicle::Column::IsVisible.eq(true));
    }

    if let StatusFilter::Is(status) = filter.status {
        condition = condition.add(vehicle::Column::Status.eq(status));
    }

    if let Some(brand) = &filter.brand {
        condition = condition.add(build_like_condition(vehicle::Column::Brand, brand));
    }

    if let Some(raw_id) = &filter.category_id {
        condition = match Uuid::parse_str(raw_id) {
            Ok(category_id) => condition.add(vehicle::Column::CategoryId.eq(category_id)),
            // No category can carry a malformed id
            Err(_) => condition.add(Expr::val(1).eq(0)),
        };
    }

    if let Some(fuel_type) = filter.fuel_type {
        condition = condition.add(vehicle::Column::FuelType.eq(fuel_type));
    }
    if let Some(transmission) = filter.transmission {
        condition = condition.add(vehicle::Column::Transmission.eq(transmission));
    }
    if let Some(body_type) = filter.body_type {
        condition = condition.add(vehicle::Column::BodyType.eq(body_type));
    }

    if let Some(min) = filter.price_min {
        condition = condition.add(vehicle::Column::Price.gte(min));
    }
    if let Some(max) = filter.price_max {
        condition = condition.add(vehicle::Column::Price.lte(max));
    }
    if let Some(min) = filter.year_min {
        condition = condition.add(vehicle::Column::Year.gte(min));
    }
    if let Some(max) = filter.year_max {
        condition = condition.add(vehicle::Column::Year.lte(max));
    }

    if filter.featured_only {
        condition = condition.add(vehicle::Column::IsFeatured.eq(true));
    }

    if let Some(query) = &filter.search {
        condition = condition.add(build_search_condition(query, &SEARCH_COLUMNS));
    }

    condition
}
