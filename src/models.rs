use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Raw query parameters accepted by the public catalog and the admin listing.
///
/// Every field is kept as an optional string so that a malformed query string
/// never fails extraction. Handlers build it with [`CatalogParams::from_pairs`]
/// from the decoded pairs, so repeated keys are not an error either. Typing happens in one place,
/// [`VehicleFilter::parse`](crate::filtering::VehicleFilter::parse), which
/// drops values it cannot understand instead of rejecting the request.
///
/// # Example
/// ```text
/// GET /api/vehicles?brand=opel&minPrice=3000&maxPrice=9000&fuelType=DIESEL&page=2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    /// Free text matched against brand, model and description.
    #[param(example = "corsa")]
    pub search: Option<String>,
    /// Case-insensitive substring of the brand.
    #[param(example = "opel")]
    pub brand: Option<String>,
    /// Category identifier.
    pub category_id: Option<String>,
    /// One of `GASOLINE`, `DIESEL`, `ELECTRIC`, `HYBRID`, `PLUGIN_HYBRID`, `GAS`.
    pub fuel_type: Option<String>,
    /// One of `MANUAL`, `AUTOMATIC`, `SEMI_AUTOMATIC`.
    pub transmission: Option<String>,
    /// One of `SEDAN`, `COUPE`, `HATCHBACK`, `WAGON`, `SUV`, `PICKUP`, `VAN`, `CONVERTIBLE`, `MINIVAN`.
    pub body_type: Option<String>,
    /// Inclusive lower price bound.
    #[param(example = "5000")]
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    #[param(example = "10000")]
    pub max_price: Option<String>,
    /// Inclusive lower registration year bound.
    pub min_year: Option<String>,
    /// Inclusive upper registration year bound.
    pub max_year: Option<String>,
    /// `true` restricts the listing to featured vehicles.
    pub featured: Option<String>,
    /// Sales status. `ALL` lifts the status restriction for administrators.
    pub status: Option<String>,
    /// Page number (1-based).
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size, capped at 100.
    #[param(example = "12")]
    pub limit: Option<String>,
}

impl CatalogParams {
    /// Fold decoded query pairs. A repeated key keeps its last value; unknown
    /// keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search" => &mut params.search,
                "brand" => &mut params.brand,
                "categoryId" => &mut params.category_id,
                "fuelType" => &mut params.fuel_type,
                "transmission" => &mut params.transmission,
                "bodyType" => &mut params.body_type,
                "minPrice" => &mut params.min_price,
                "maxPrice" => &mut params.max_price,
                "minYear" => &mut params.min_year,
                "maxYear" => &mut params.max_year,
                "featured" => &mut params.featured,
                "status" => &mut params.status,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }
}
