//! Material price category entity - Groups weight-banded price tiers.
//!
//! A category represents one purchasable material family (e.g., "steel 11SMn30
//! round stock") whose per-kg price depends on the total ordered weight.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material price category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_price_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the material family
    pub name: String,
}

/// Defines relationships between category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many weight-banded price tiers
    #[sea_orm(has_many = "super::material_price_tier::Entity")]
    Tiers,
}

impl Related<super::material_price_tier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tiers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
