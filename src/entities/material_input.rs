//! Material input entity - One piece of stock consumed per part.
//!
//! Dimensions are shape-specific and nullable in the database; the geometry
//! calculator decides which ones a given shape requires. Soft-deleted inputs
//! (`deleted_at` set) are excluded from all cost calculations.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock shape of a material input, stored as a string column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum StockShape {
    /// Solid round bar: diameter + length
    #[sea_orm(string_value = "round_bar")]
    RoundBar,
    /// Hollow tube: diameter + wall thickness + length
    #[sea_orm(string_value = "tube")]
    Tube,
    /// Flat plate: width + thickness + length
    #[sea_orm(string_value = "plate")]
    Plate,
    /// Solid square bar: width + length
    #[sea_orm(string_value = "square_bar")]
    SquareBar,
}

impl StockShape {
    /// Stable lowercase name, used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoundBar => "round_bar",
            Self::Tube => "tube",
            Self::Plate => "plate",
            Self::SquareBar => "square_bar",
        }
    }
}

/// Material input database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_inputs")]
pub struct Model {
    /// Unique identifier for the material input
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning part
    pub part_id: i64,
    /// Stock shape determining which dimensions are required
    pub shape: StockShape,
    /// Outer diameter in mm (round bar, tube)
    pub diameter_mm: Option<f64>,
    /// Stock length in mm (all shapes)
    pub length_mm: Option<f64>,
    /// Width in mm (plate, square bar)
    pub width_mm: Option<f64>,
    /// Thickness in mm (plate)
    pub thickness_mm: Option<f64>,
    /// Wall thickness in mm (tube)
    pub wall_thickness_mm: Option<f64>,
    /// Pieces of this stock consumed per single part
    pub quantity_per_part: i32,
    /// Material density in kg/cm³ (steel ≈ 0.00785)
    pub density_kg_cm3: f64,
    /// Price category used for tiered per-kg pricing, None when not yet assigned
    pub price_category_id: Option<i64>,
    /// Soft delete timestamp - set when the input is removed from the part
    pub deleted_at: Option<DateTime<Utc>>,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
}

/// Defines relationships between material input and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each input belongs to exactly one part
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
    /// Optional price category for tier lookup
    #[sea_orm(
        belongs_to = "super::material_price_category::Entity",
        from = "Column::PriceCategoryId",
        to = "super::material_price_category::Column::Id"
    )]
    PriceCategory,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl Related<super::material_price_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
