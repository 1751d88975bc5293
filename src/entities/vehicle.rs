use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    #[sea_orm(string_value = "GASOLINE")]
    Gasoline,
    #[sea_orm(string_value = "DIESEL")]
    Diesel,
    #[sea_orm(string_value = "ELECTRIC")]
    Electric,
    #[sea_orm(string_value = "HYBRID")]
    Hybrid,
    #[sea_orm(string_value = "PLUGIN_HYBRID")]
    PluginHybrid,
    #[sea_orm(string_value = "GAS")]
    Gas,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transmission {
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "AUTOMATIC")]
    Automatic,
    #[sea_orm(string_value = "SEMI_AUTOMATIC")]
    SemiAutomatic,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyType {
    #[sea_orm(string_value = "SEDAN")]
    Sedan,
    #[sea_orm(string_value = "COUPE")]
    Coupe,
    #[sea_orm(string_value = "HATCHBACK")]
    Hatchback,
    #[sea_orm(string_value = "WAGON")]
    Wagon,
    #[sea_orm(string_value = "SUV")]
    Suv,
    #[sea_orm(string_value = "PICKUP")]
    Pickup,
    #[sea_orm(string_value = "VAN")]
    Van,
    #[sea_orm(string_value = "CONVERTIBLE")]
    Convertible,
    #[sea_orm(string_value = "MINIVAN")]
    Minivan,
}

/// Sales state of a listed vehicle.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
    #[sea_orm(string_value = "SOLD")]
    Sold,
    #[sea_orm(string_value = "PENDING")]
    Pending,
}

/// Equipment list stored as a JSON array of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct FeatureList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "vehicles")]
#[serde(rename_all = "camelCase")]
#[schema(as = Vehicle)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub price_negotiable: bool,
    pub status: VehicleStatus,
    pub is_visible: bool,
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
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Json")]
    pub features: FeatureList,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,

    #[sea_orm(has_many = "super::vehicle_image::Entity")]
    Images,

    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiries,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::vehicle_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
