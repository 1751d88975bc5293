//! Vehicle management: admin CRUD, the public detail page and dashboard figures.

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionTrait, sea_query::Expr, sea_query::Order,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::{VehicleStore, VehicleSummary};
use crate::entities::{
    BodyType, FeatureList, FuelType, Transmission, VehicleStatus, category, vehicle, vehicle_image,
};
use crate::errors::ApiError;
use crate::slug::{vehicle_slug, with_timestamp_suffix};
use crate::traits::MergeIntoActiveModel;
use crate::validation::{Validatable, ValidationErrors, validators};

/// How many related vehicles the public detail page shows.
pub const SIMILAR_VEHICLES_LIMIT: u64 = 3;

pub const MIN_YEAR: i32 = 1900;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

/// Vehicle with its ordered gallery and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    #[serde(flatten)]
    pub vehicle: vehicle::Model,
    pub images: Vec<vehicle_image::Model>,
    pub category: Option<category::Model>,
}

/// Public detail page payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePage {
    #[serde(flatten)]
    pub detail: VehicleDetail,
    /// Same brand, publicly listed, most recent first.
    pub similar: Vec<VehicleSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vehicles: u64,
    pub available_vehicles: u64,
    pub sold_vehicles: u64,
    /// Sum of the prices of available vehicles.
    pub inventory_value: f64,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCreate {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(default)]
    pub price_negotiable: bool,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub doors: Option<i32>,
    pub seats: Option<i32>,
    pub engine_size: Option<String>,
    pub engine_power: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub previous_owners: Option<i32>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Image URLs in gallery order.
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: Option<Uuid>,
}

/// Partial update. Absent fields are left alone; `categoryId: null` clears the
/// category. A supplied `images` list replaces the whole gallery.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub price_negotiable: Option<bool>,
    pub status: Option<VehicleStatus>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub doors: Option<i32>,
    pub seats: Option<i32>,
    pub engine_size: Option<String>,
    pub engine_power: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub previous_owners: Option<i32>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
}

fn latest_model_year() -> i32 {
    Utc::now().year() + 1
}

/// Rules shared by create and update; `None` means "not supplied".
struct VehicleFields<'a> {
    brand: Option<&'a str>,
    model: Option<&'a str>,
    year: Option<i32>,
    price: Option<f64>,
    mileage: Option<i32>,
    doors: Option<i32>,
    seats: Option<i32>,
    previous_owners: Option<i32>,
    description: Option<&'a str>,
    images: Option<&'a [String]>,
}

impl VehicleFields<'_> {
    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(brand) = self.brand {
            errors.check(validators::validate_required("brand", brand));
        }
        if let Some(model) = self.model {
            errors.check(validators::validate_required("model", model));
        }
        if let Some(year) = self.year {
            errors.check(validators::validate_range(
                "year",
                year,
                Some(MIN_YEAR),
                Some(latest_model_year()),
            ));
        }
        // JSON has no NaN or infinity, so positivity is enough
        errors.check(validators::validate_positive("price", self.price));
        errors.check(validators::validate_positive("mileage", self.mileage));
        errors.check(validators::validate_positive("doors", self.doors));
        errors.check(validators::validate_positive("seats", self.seats));
        if let Some(owners) = self.previous_owners {
            errors.check(validators::validate_range("previousOwners", owners, Some(0), None));
        }
        if let Some(description) = self.description {
            errors.check(validators::validate_length(
                "description",
                description,
                Some(MIN_DESCRIPTION_LENGTH),
                None,
            ));
        }
        if let Some(images) = self.images
            && images.iter().any(|url| url.trim().is_empty())
        {
            errors.check(validators::validate_required("images", ""));
        }

        errors.result()
    }
}

impl Validatable for VehicleCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        VehicleFields {
            brand: Some(&self.brand),
            model: Some(&self.model),
            year: Some(self.year),
            price: Some(self.price),
            mileage: self.mileage,
            doors: self.doors,
            seats: self.seats,
            previous_owners: self.previous_owners,
            description: Some(&self.description),
            images: Some(&self.images),
        }
        .check()
    }
}

impl Validatable for VehicleUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        VehicleFields {
            brand: self.brand.as_deref(),
            model: self.model.as_deref(),
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            doors: self.doors,
            seats: self.seats,
            previous_owners: self.previous_owners,
            description: self.description.as_deref(),
            images: self.images.as_deref(),
        }
        .check()
    }
}

impl MergeIntoActiveModel<vehicle::ActiveModel> for VehicleUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: vehicle::ActiveModel,
    ) -> Result<vehicle::ActiveModel, DbErr> {
        if let Some(brand) = self.brand {
            existing.brand = Set(brand.trim().to_string());
        }
        if let Some(model) = self.model {
            existing.model = Set(model.trim().to_string());
        }
        if let Some(year) = self.year {
            existing.year = Set(year);
        }
        if let Some(price) = self.price {
            existing.price = Set(price);
        }
        if let Some(negotiable) = self.price_negotiable {
            existing.price_negotiable = Set(negotiable);
        }
        if let Some(status) = self.status {
            existing.status = Set(status);
        }
        if let Some(visible) = self.is_visible {
            existing.is_visible = Set(visible);
        }
        if let Some(featured) = self.is_featured {
            existing.is_featured = Set(featured);
        }
        if self.mileage.is_some() {
            existing.mileage = Set(self.mileage);
        }
        if self.fuel_type.is_some() {
            existing.fuel_type = Set(self.fuel_type);
        }
        if self.transmission.is_some() {
            existing.transmission = Set(self.transmission);
        }
        if self.body_type.is_some() {
            existing.body_type = Set(self.body_type);
        }
        if self.exterior_color.is_some() {
            existing.exterior_color = Set(self.exterior_color);
        }
        if self.interior_color.is_some() {
            existing.interior_color = Set(self.interior_color);
        }
        if self.doors.is_some() {
            existing.doors = Set(self.doors);
        }
        if self.seats.is_some() {
            existing.seats = Set(self.seats);
        }
        if self.engine_size.is_some() {
            existing.engine_size = Set(self.engine_size);
        }
        if self.engine_power.is_some() {
            existing.engine_power = Set(self.engine_power);
        }
        if self.vin.is_some() {
            existing.vin = Set(self.vin);
        }
        if self.license_plate.is_some() {
            existing.license_plate = Set(self.license_plate);
        }
        if self.previous_owners.is_some() {
            existing.previous_owners = Set(self.previous_owners);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(features) = self.features {
            existing.features = Set(FeatureList(features));
        }
        if let Some(category_id) = self.category_id {
            existing.category_id = Set(category_id);
        }
        Ok(existing)
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::not_found("Vehicle", Some(id.to_string()))
}

/// `base`, or `base-<millis>` when another vehicle already uses it.
async fn unique_slug<C>(conn: &C, base: String, exclude: Option<Uuid>) -> Result<String, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = vehicle::Entity::find().filter(vehicle::Column::Slug.eq(base.as_str()));
    if let Some(id) = exclude {
        query = query.filter(vehicle::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        Ok(with_timestamp_suffix(&base))
    } else {
        Ok(base)
    }
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Insert,
    Update,
}

impl Write {
    async fn run<C>(self, row: vehicle::ActiveModel, conn: &C) -> Result<vehicle::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        match self {
            Self::Insert => row.insert(conn).await,
            Self::Update => row.update(conn).await,
        }
    }
}

/// Write `row` under a savepoint. When a concurrent writer claimed the slug in
/// the meantime, roll back to the savepoint and write again as `base-<millis>`.
async fn write_with_slug_retry(
    txn: &DatabaseTransaction,
    mut row: vehicle::ActiveModel,
    base: &str,
    write: Write,
) -> Result<vehicle::Model, DbErr> {
    let attempt = txn.begin().await?;
    match write.run(row.clone(), &attempt).await {
        Ok(model) => {
            attempt.commit().await?;
            Ok(model)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            attempt.rollback().await?;
            let slug = with_timestamp_suffix(base);
            tracing::debug!(%slug, "Slug taken concurrently, retrying with suffix");
            row.slug = Set(slug);
            write.run(row, txn).await
        }
        Err(err) => Err(err),
    }
}

async fn ensure_category_exists(db: &DatabaseConnection, id: Uuid) -> Result<(), ApiError> {
    match category::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::invalid_field("categoryId", "Unknown category")),
    }
}

async fn insert_gallery<C>(
    conn: &C,
    vehicle: &vehicle::Model,
    urls: &[String],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if urls.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let rows = urls.iter().enumerate().map(|(index, url)| vehicle_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        vehicle_id: Set(vehicle.id),
        url: Set(url.trim().to_string()),
        alt_text: Set(Some(format!(
            "{} {} - Image {}",
            vehicle.brand,
            vehicle.model,
            index + 1
        ))),
        position: Set(i32::try_from(index).unwrap_or(i32::MAX)),
        created_at: Set(now),
    });

    vehicle_image::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn load_detail<C>(conn: &C, vehicle: vehicle::Model) -> Result<VehicleDetail, DbErr>
where
    C: ConnectionTrait,
{
    let images = vehicle
        .find_related(vehicle_image::Entity)
        .order_by_asc(vehicle_image::Column::Position)
        .all(conn)
        .await?;

    let category = match vehicle.category_id {
        Some(category_id) => category::Entity::find_by_id(category_id).one(conn).await?,
        None => None,
    };

    Ok(VehicleDetail {
        vehicle,
        images,
        category,
    })
}

/// New row from a validated payload. The gallery is inserted separately.
fn new_row(payload: VehicleCreate, slug: String) -> vehicle::ActiveModel {
    let now = Utc::now();
    vehicle::ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(slug),
        brand: Set(payload.brand.trim().to_string()),
        model: Set(payload.model.trim().to_string()),
        year: Set(payload.year),
        price: Set(payload.price),
        price_negotiable: Set(payload.price_negotiable),
        status: Set(payload.status),
        is_visible: Set(payload.is_visible),
        is_featured: Set(payload.is_featured),
        mileage: Set(payload.mileage),
        fuel_type: Set(payload.fuel_type),
        transmission: Set(payload.transmission),
        body_type: Set(payload.body_type),
        exterior_color: Set(payload.exterior_color),
        interior_color: Set(payload.interior_color),
        doors: Set(payload.doors),
        seats: Set(payload.seats),
        engine_size: Set(payload.engine_size),
        engine_power: Set(payload.engine_power),
        vin: Set(payload.vin),
        license_plate: Set(payload.license_plate),
        previous_owners: Set(payload.previous_owners),
        description: Set(payload.description),
        features: Set(FeatureList(payload.features)),
        category_id: Set(payload.category_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// # Errors
///
/// 422 on invalid input or unknown category, 500 on storage failure.
pub async fn create_vehicle(
    db: &DatabaseConnection,
    mut payload: VehicleCreate,
) -> Result<VehicleDetail, ApiError> {
    payload.validate()?;
    if let Some(category_id) = payload.category_id {
        ensure_category_exists(db, category_id).await?;
    }

    let base = vehicle_slug(payload.brand.trim(), payload.model.trim(), payload.year);
    let gallery = std::mem::take(&mut payload.images);

    let txn = db.begin().await?;
    let slug = unique_slug(&txn, base.clone(), None).await?;
    let created = write_with_slug_retry(&txn, new_row(payload, slug), &base, Write::Insert).await?;
    insert_gallery(&txn, &created, &gallery).await?;
    txn.commit().await?;

    tracing::info!(vehicle_id = %created.id, slug = %created.slug, "Vehicle created");
    Ok(load_detail(db, created).await?)
}

/// # Errors
///
/// 404 when the vehicle does not exist, 422 on invalid input.
pub async fn update_vehicle(
    db: &DatabaseConnection,
    id: Uuid,
    mut payload: VehicleUpdate,
) -> Result<VehicleDetail, ApiError> {
    let existing = vehicle::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))?;

    payload.validate()?;
    if let Some(Some(category_id)) = payload.category_id {
        ensure_category_exists(db, category_id).await?;
    }

    let identity_changed =
        payload.brand.is_some() || payload.model.is_some() || payload.year.is_some();
    let base = identity_changed.then(|| {
        let brand = payload.brand.as_deref().map_or(existing.brand.as_str(), str::trim);
        let model = payload.model.as_deref().map_or(existing.model.as_str(), str::trim);
        let year = payload.year.unwrap_or(existing.year);
        vehicle_slug(brand, model, year)
    });
    let gallery = payload.images.take();

    let txn = db.begin().await?;
    let mut active = payload.merge_into_activemodel(existing.into_active_model())?;
    active.updated_at = Set(Utc::now());
    let updated = match base {
        Some(base) => {
            active.slug = Set(unique_slug(&txn, base.clone(), Some(id)).await?);
            write_with_slug_retry(&txn, active, &base, Write::Update).await?
        }
        None => active.update(&txn).await?,
    };

    if let Some(urls) = gallery {
        vehicle_image::Entity::delete_many()
            .filter(vehicle_image::Column::VehicleId.eq(id))
            .exec(&txn)
            .await?;
        insert_gallery(&txn, &updated, &urls).await?;
    }
    txn.commit().await?;

    tracing::info!(vehicle_id = %id, slug = %updated.slug, "Vehicle updated");
    Ok(load_detail(db, updated).await?)
}

/// Delete a vehicle and its gallery. Inquiries keep their text and lose the link.
///
/// # Errors
///
/// 404 when the vehicle does not exist.
pub async fn delete_vehicle(db: &DatabaseConnection, id: Uuid) -> Result<(), ApiError> {
    let txn = db.begin().await?;
    vehicle_image::Entity::delete_many()
        .filter(vehicle_image::Column::VehicleId.eq(id))
        .exec(&txn)
        .await?;
    let result = vehicle::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(not_found(id));
    }
    txn.commit().await?;

    tracing::info!(vehicle_id = %id, "Vehicle deleted");
    Ok(())
}

/// Admin view of any vehicle, hidden ones included.
///
/// # Errors
///
/// 404 when the vehicle does not exist.
pub async fn get_vehicle(db: &DatabaseConnection, id: Uuid) -> Result<VehicleDetail, ApiError> {
    let vehicle = vehicle::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(load_detail(db, vehicle).await?)
}

/// Public detail page. Hidden vehicles do not exist for this endpoint.
///
/// # Errors
///
/// 404 when no visible vehicle has this slug.
pub async fn get_public_vehicle(db: &DatabaseConnection, slug: &str) -> Result<VehiclePage, ApiError> {
    let vehicle = vehicle::Entity::find()
        .filter(vehicle::Column::Slug.eq(slug))
        .filter(vehicle::Column::IsVisible.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Vehicle", Some(slug.to_string())))?;

    let similar = similar_vehicles(db, &vehicle).await?;
    let detail = load_detail(db, vehicle).await?;
    Ok(VehiclePage { detail, similar })
}

async fn similar_vehicles(
    db: &DatabaseConnection,
    vehicle: &vehicle::Model,
) -> Result<Vec<VehicleSummary>, DbErr> {
    let condition = Condition::all()
        .add(vehicle::Column::Brand.eq(vehicle.brand.as_str()))
        .add(vehicle::Column::IsVisible.eq(true))
        .add(vehicle::Column::Status.eq(VehicleStatus::Available))
        .add(vehicle::Column::Id.ne(vehicle.id));
    let order = [
        (vehicle::Column::CreatedAt, Order::Desc),
        (vehicle::Column::Id, Order::Asc),
    ];
    db.find_many(condition, &order, 0, SIMILAR_VEHICLES_LIMIT).await
}

/// # Errors
///
/// Propagates database errors.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats, ApiError> {
    let total_vehicles = vehicle::Entity::find().count(db).await?;
    let available_vehicles = vehicle::Entity::find()
        .filter(vehicle::Column::Status.eq(VehicleStatus::Available))
        .count(db)
        .await?;
    let sold_vehicles = vehicle::Entity::find()
        .filter(vehicle::Column::Status.eq(VehicleStatus::Sold))
        .count(db)
        .await?;
    let inventory_value = vehicle::Entity::find()
        .select_only()
        .column_as(Expr::col(vehicle::Column::Price).sum(), "inventory_value")
        .filter(vehicle::Column::Status.eq(VehicleStatus::Available))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0.0);

    Ok(DashboardStats {
        total_vehicles,
        available_vehicles,
        sold_vehicles,
        inventory_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> VehicleCreate {
        serde_json::from_value(serde_json::json!({
            "brand": "Opel",
            "model": "Corsa",
            "year": 2015,
            "price": 7500.0,
            "description": "Well kept, one owner, full service history."
        }))
        .unwrap()
    }

    fn fields(errors: &ValidationErrors) -> Vec<&str> {
        errors.errors().iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_create_defaults() {
        let payload = valid_create();
        assert!(payload.is_visible);
        assert!(!payload.is_featured);
        assert!(!payload.price_negotiable);
        assert_eq!(payload.status, VehicleStatus::Available);
        assert!(payload.images.is_empty());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let payload = VehicleCreate {
            brand: "  ".to_string(),
            year: 1850,
            price: 0.0,
            mileage: Some(0),
            description: "short".to_string(),
            ..valid_create()
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["brand", "year", "price", "mileage", "description"]);
    }

    #[test]
    fn test_year_upper_bound_is_next_year() {
        let next = VehicleCreate {
            year: latest_model_year(),
            ..valid_create()
        };
        assert!(next.validate().is_ok());

        let too_new = VehicleCreate {
            year: latest_model_year() + 1,
            ..valid_create()
        };
        assert_eq!(fields(&too_new.validate().unwrap_err()), vec!["year"]);
    }

    #[test]
    fn test_update_only_checks_supplied_fields() {
        assert!(VehicleUpdate::default().validate().is_ok());

        let update = VehicleUpdate {
            description: Some("tiny".to_string()),
            ..VehicleUpdate::default()
        };
        assert_eq!(fields(&update.validate().unwrap_err()), vec!["description"]);
    }

    #[test]
    fn test_update_category_tristate() {
        let absent: VehicleUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: VehicleUpdate = serde_json::from_str(r#"{"categoryId": null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let id = Uuid::new_v4();
        let set: VehicleUpdate =
            serde_json::from_value(serde_json::json!({ "categoryId": id })).unwrap();
        assert_eq!(set.category_id, Some(Some(id)));
    }

    #[test]
    fn test_status_must_be_known() {
        let result: Result<VehicleUpdate, _> = serde_json::from_str(r#"{"status": "STOLEN"}"#);
        assert!(result.is_err());
    }

    async fn migrated_db() -> DatabaseConnection {
        use sea_orm_migration::MigratorTrait;
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        crate::migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_hitting_taken_slug_retries_with_suffix() {
        let db = migrated_db().await;
        let first = create_vehicle(&db, valid_create()).await.unwrap();
        assert_eq!(first.vehicle.slug, "opel-corsa-2015");

        // Same slug as if another writer had committed it after our lookup
        let txn = db.begin().await.unwrap();
        let row = new_row(valid_create(), "opel-corsa-2015".to_string());
        let second = write_with_slug_retry(&txn, row, "opel-corsa-2015", Write::Insert)
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert!(second.slug.starts_with("opel-corsa-2015-"), "got {}", second.slug);
        assert_eq!(vehicle::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_hitting_taken_slug_retries_with_suffix() {
        let db = migrated_db().await;
        create_vehicle(&db, valid_create()).await.unwrap();
        let mut payload = valid_create();
        payload.brand = "Seat".to_string();
        payload.model = "Ibiza".to_string();
        let other = create_vehicle(&db, payload).await.unwrap();

        let txn = db.begin().await.unwrap();
        let mut active = other.vehicle.clone().into_active_model();
        active.slug = Set("opel-corsa-2015".to_string());
        let renamed = write_with_slug_retry(&txn, active, "opel-corsa-2015", Write::Update)
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(renamed.id, other.vehicle.id);
        assert!(renamed.slug.starts_with("opel-corsa-2015-"), "got {}", renamed.slug);
    }

    #[tokio::test]
    async fn test_create_twice_suffixes_second_slug() {
        let db = migrated_db().await;
        let first = create_vehicle(&db, valid_create()).await.unwrap();
        let second = create_vehicle(&db, valid_create()).await.unwrap();
        assert_eq!(first.vehicle.slug, "opel-corsa-2015");
        assert!(second.vehicle.slug.starts_with("opel-corsa-2015-"));
    }
}
