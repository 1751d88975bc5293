use sea_orm::{EntityTrait, QueryOrder, Select, sea_query::Order};

use crate::entities::vehicle;

/// Canonical catalog ordering: featured first, newest first, then id as a
/// tie-breaker so that equal timestamps still page deterministically.
#[must_use]
pub fn catalog_order() -> [(vehicle::Column, Order); 3] {
    [
        (vehicle::Column::IsFeatured, Order::Desc),
        (vehicle::Column::CreatedAt, Order::Desc),
        (vehicle::Column::Id, Order::Asc),
    ]
}

/// Apply a list of `(column, direction)` pairs to a select, in order.
pub fn apply_order<E>(select: Select<E>, order: &[(E::Column, Order)]) -> Select<E>
where
    E: EntityTrait,
    E::Column: Copy,
{
    order
        .iter()
        .fold(select, |query, (column, direction)| {
            query.order_by(*column, direction.clone())
        })
}
