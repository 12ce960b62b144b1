//! Material price tier entity - One weight band of a price category.
//!
//! Tiers of a category are expected to partition weight space without gaps;
//! the top tier is open-ended (`max_weight_kg = None`). Enforcing
//! gap/overlap-freeness is a data-integrity concern of the reference-data
//! layer, not of tier selection.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material price tier database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_price_tiers")]
pub struct Model {
    /// Unique identifier for the tier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning price category
    pub category_id: i64,
    /// Inclusive lower bound of the weight band, in kg
    pub min_weight_kg: f64,
    /// Exclusive upper bound of the weight band in kg, None for the open-ended top tier
    pub max_weight_kg: Option<f64>,
    /// Price per kilogram within this band
    pub price_per_kg: f64,
}

/// Defines relationships between tier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tier belongs to exactly one category
    #[sea_orm(
        belongs_to = "super::material_price_category::Entity",
        from = "Column::CategoryId",
        to = "super::material_price_category::Column::Id"
    )]
    Category,
}

impl Related<super::material_price_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
