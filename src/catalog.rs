//! # Catalog listing
//!
//! Runs a parsed [`VehicleFilter`] against storage and assembles a
//! [`PageEnvelope`] of [`VehicleSummary`] rows. The same path serves the public
//! catalog and the admin listing; only the [`Audience`] differs.
//!
//! Count and fetch are two independent reads. Under concurrent writes the
//! reported `total` can disagree with the rows returned by one or two; this is
//! accepted, the next request sees a consistent state again.
//!
//! A storage failure or a query that exceeds the configured timeout surfaces as
//! [`CatalogError::Unavailable`] and is never turned into an empty page.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Order,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{BodyType, FuelType, Transmission, VehicleStatus, category, vehicle, vehicle_image};
use crate::filtering::{Audience, BuildOptions, VehicleFilter, apply_order, build_condition, catalog_order};
use crate::pagination::PageEnvelope;

/// Cover image of a listed vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<category::Model> for CategoryRef {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

/// Read-only projection of a vehicle as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub slug: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub price_negotiable: bool,
    pub status: VehicleStatus,
    pub is_visible: bool,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub is_featured: bool,
    /// Lowest-position image, if the vehicle has any.
    pub primary_image: Option<ImageRef>,
    pub category: Option<CategoryRef>,
}

impl VehicleSummary {
    #[must_use]
    pub fn from_parts(
        vehicle: vehicle::Model,
        category: Option<category::Model>,
        primary_image: Option<ImageRef>,
    ) -> Self {
        Self {
            id: vehicle.id,
            slug: vehicle.slug,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            price: vehicle.price,
            price_negotiable: vehicle.price_negotiable,
            status: vehicle.status,
            is_visible: vehicle.is_visible,
            mileage: vehicle.mileage,
            fuel_type: vehicle.fuel_type,
            transmission: vehicle.transmission,
            body_type: vehicle.body_type,
            is_featured: vehicle.is_featured,
            primary_image,
            category: category.map(CategoryRef::from),
        }
    }
}

/// Why a catalog listing could not be produced.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("vehicle catalog is unavailable: {0}")]
    Unavailable(#[source] UnavailableCause),
}

#[derive(Debug, Error)]
pub enum UnavailableCause {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("query exceeded {0:?}")]
    TimedOut(Duration),
}

/// Storage behind the catalog listing.
///
/// Both methods report failure through `Err`, so a broken connection is never
/// confused with zero matching rows.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn find_many(
        &self,
        condition: Condition,
        order: &[(vehicle::Column, Order)],
        skip: u64,
        take: u64,
    ) -> Result<Vec<VehicleSummary>, DbErr>;

    async fn count(&self, condition: Condition) -> Result<u64, DbErr>;
}

#[async_trait]
impl VehicleStore for DatabaseConnection {
    async fn find_many(
        &self,
        condition: Condition,
        order: &[(vehicle::Column, Order)],
        skip: u64,
        take: u64,
    ) -> Result<Vec<VehicleSummary>, DbErr> {
        let rows = apply_order(vehicle::Entity::find().filter(condition), order)
            .find_also_related(category::Entity)
            .offset(skip)
            .limit(take)
            .all(self)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(vehicle, _)| vehicle.id).collect();
        let mut covers = primary_images(self, ids).await?;

        Ok(rows
            .into_iter()
            .map(|(vehicle, category)| {
                let cover = covers.remove(&vehicle.id);
                VehicleSummary::from_parts(vehicle, category, cover)
            })
            .collect())
    }

    async fn count(&self, condition: Condition) -> Result<u64, DbErr> {
        vehicle::Entity::find().filter(condition).count(self).await
    }
}

/// First image (by position) of each given vehicle, loaded in one query.
pub(crate) async fn primary_images(
    db: &DatabaseConnection,
    vehicle_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, ImageRef>, DbErr> {
    if vehicle_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let images = vehicle_image::Entity::find()
        .filter(vehicle_image::Column::VehicleId.is_in(vehicle_ids))
        .order_by_asc(vehicle_image::Column::Position)
        .order_by_asc(vehicle_image::Column::CreatedAt)
        .all(db)
        .await?;

    let mut covers = HashMap::new();
    for image in images {
        covers.entry(image.vehicle_id).or_insert(ImageRef {
            url: image.url,
            alt_text: image.alt_text,
        });
    }
    Ok(covers)
}

async fn bounded<T>(
    limit: Duration,
    query: impl Future<Output = Result<T, DbErr>>,
) -> Result<T, CatalogError> {
    match tokio::time::timeout(limit, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(CatalogError::Unavailable(UnavailableCause::Database(err))),
        Err(_) => Err(CatalogError::Unavailable(UnavailableCause::TimedOut(limit))),
    }
}

/// List one page of the catalog.
///
/// Counts first; when the requested page starts past the last match the fetch
/// is skipped and an empty page carrying the real total is returned.
///
/// # Errors
///
/// [`CatalogError::Unavailable`] when either query fails or exceeds `timeout`.
pub async fn fetch_page<S>(
    store: &S,
    filter: &VehicleFilter,
    audience: Audience,
    timeout: Duration,
) -> Result<PageEnvelope<VehicleSummary>, CatalogError>
where
    S: VehicleStore + ?Sized,
{
    let condition = build_condition(filter, &BuildOptions::for_audience(audience));
    let request = filter.page;

    let total = bounded(timeout, store.count(condition.clone())).await?;
    if request.skip() >= total {
        tracing::debug!(total, page = request.page(), "catalog page past last match");
        return Ok(PageEnvelope::assemble(Vec::new(), total, request));
    }

    let order = catalog_order();
    let items = bounded(
        timeout,
        store.find_many(condition, &order, request.skip(), request.take()),
    )
    .await?;

    Ok(PageEnvelope::assemble(items, total, request))
}

/// Distinct brands of publicly listed vehicles, alphabetical.
///
/// # Errors
///
/// Propagates database errors.
pub async fn list_brands(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    vehicle::Entity::find()
        .select_only()
        .column(vehicle::Column::Brand)
        .distinct()
        .filter(vehicle::Column::IsVisible.eq(true))
        .filter(vehicle::Column::Status.eq(VehicleStatus::Available))
        .order_by_asc(vehicle::Column::Brand)
        .into_tuple::<String>()
        .all(db)
        .await
}
