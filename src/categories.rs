use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{category, vehicle};
use crate::errors::ApiError;
use crate::slug::slugify;
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: category::Model,
    /// Vehicles in this category, hidden and sold ones included.
    pub vehicle_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Display order, lowest first.
    #[serde(default)]
    pub position: i32,
}

impl Validatable for CategoryCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        if errors.is_empty() && slugify(&self.name).is_empty() {
            errors.add(ValidationError::new(
                "name",
                "Must contain at least one letter or digit",
            ));
        }
        errors.result()
    }
}

/// All categories by display position, then name.
///
/// # Errors
///
/// Propagates database errors.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryWithCount>, ApiError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Position)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;

    let counts: HashMap<Uuid, i64> = vehicle::Entity::find()
        .select_only()
        .column(vehicle::Column::CategoryId)
        .column_as(Expr::col(vehicle::Column::Id).count(), "vehicle_count")
        .filter(vehicle::Column::CategoryId.is_not_null())
        .group_by(vehicle::Column::CategoryId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(categories
        .into_iter()
        .map(|category| {
            let vehicle_count = counts
                .get(&category.id)
                .map_or(0, |count| u64::try_from(*count).unwrap_or(0));
            CategoryWithCount {
                category,
                vehicle_count,
            }
        })
        .collect())
}

/// # Errors
///
/// 422 on a blank name, 409 when the derived slug is already taken.
pub async fn create_category(
    db: &DatabaseConnection,
    payload: CategoryCreate,
) -> Result<category::Model, ApiError> {
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let slug = slugify(&name);

    let taken = category::Entity::find()
        .filter(category::Column::Slug.eq(slug.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(ApiError::conflict(format!(
            "A category with slug '{slug}' already exists"
        )));
    }

    let created = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(payload.description),
        icon: Set(payload.icon),
        position: Set(payload.position),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    tracing::info!(category_id = %created.id, slug = %created.slug, "Category created");
    Ok(created)
}
