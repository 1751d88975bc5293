use sea_orm::ActiveEnum;

use crate::entities::{BodyType, FuelType, Transmission, VehicleStatus};
use crate::models::CatalogParams;
use crate::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageRequest};

/// Raw `status` value that lifts the status restriction for administrators.
pub const ANY_STATUS: &str = "ALL";

/// Who is asking. Decides the status default and whether hidden vehicles and
/// the unrestricted status filter are reachable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Is(VehicleStatus),
    Any,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::Is(VehicleStatus::Available)
    }
}

/// Normalized catalog query. Built once per request by [`VehicleFilter::parse`]
/// and never mutated afterwards.
///
/// Inverted bounds (`price_min > price_max`, `year_min > year_max`) are kept as
/// given; the range predicates then simply match nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub status: StatusFilter,
    pub featured_only: bool,
    pub page: PageRequest,
}

impl Default for VehicleFilter {
    fn default() -> Self {
        Self {
            search: None,
            brand: None,
            category_id: None,
            fuel_type: None,
            transmission: None,
            body_type: None,
            price_min: None,
            price_max: None,
            year_min: None,
            year_max: None,
            status: StatusFilter::default(),
            featured_only: false,
            page: PageRequest::default(),
        }
    }
}

impl VehicleFilter {
    /// Turn raw query parameters into a typed filter.
    ///
    /// Never fails: values that do not parse, or enum values outside the known
    /// set, are treated as absent. `page` and `limit` fall back to their
    /// defaults and are coerced into their valid ranges.
    #[must_use]
    pub fn parse(params: &CatalogParams, audience: Audience) -> Self {
        let page = parse_page_number(params.page.as_deref(), DEFAULT_PAGE);
        let page_size = parse_page_number(params.limit.as_deref(), DEFAULT_PAGE_SIZE);

        Self {
            search: non_empty(params.search.as_deref()),
            brand: non_empty(params.brand.as_deref()),
            category_id: non_empty(params.category_id.as_deref()),
            fuel_type: parse_enum(params.fuel_type.as_deref()),
            transmission: parse_enum(params.transmission.as_deref()),
            body_type: parse_enum(params.body_type.as_deref()),
            price_min: parse_price(params.min_price.as_deref()),
            price_max: parse_price(params.max_price.as_deref()),
            year_min: parse_trimmed(params.min_year.as_deref()),
            year_max: parse_trimmed(params.max_year.as_deref()),
            status: parse_status(params.status.as_deref(), audience),
            featured_only: params
                .featured
                .as_deref()
                .is_some_and(|raw| raw.trim().eq_ignore_ascii_case("true")),
            page: PageRequest::new(page, page_size),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn parse_trimmed<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    parse_trimmed::<f64>(raw).filter(|price| price.is_finite() && *price >= 0.0)
}

/// Page numbers and sizes: absent or unparseable falls back to `default`,
/// anything below 1 becomes 1.
fn parse_page_number(raw: Option<&str>, default: u64) -> u64 {
    match parse_trimmed::<i64>(raw) {
        Some(value) => u64::try_from(value).unwrap_or(0).max(1),
        None => default,
    }
}

/// Match a raw value against the string values of an active enum, ignoring case.
pub(crate) fn parse_enum<E>(raw: Option<&str>) -> Option<E>
where
    E: ActiveEnum<Value = String>,
{
    let wanted = raw?.trim();
    E::iter().find(|variant| variant.to_value().eq_ignore_ascii_case(wanted))
}

fn parse_status(raw: Option<&str>, audience: Audience) -> StatusFilter {
    let requested = raw.map(str::trim).filter(|value| !value.is_empty());
    match (audience, requested) {
        (Audience::Admin, None) => StatusFilter::Any,
        (Audience::Admin, Some(value)) if value.eq_ignore_ascii_case(ANY_STATUS) => StatusFilter::Any,
        (Audience::Admin, Some(value)) => {
            parse_enum(Some(value)).map_or(StatusFilter::Any, StatusFilter::Is)
        }
        (Audience::Public, value) => {
            parse_enum(value).map_or_else(StatusFilter::default, StatusFilter::Is)
        }
    }
}
