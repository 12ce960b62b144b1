//! Batch entity - A priced production run of a fixed quantity of one part.
//!
//! Cost fields are denormalized results of the pricing pipeline. A draft batch
//! is recomputed whenever its inputs change; once `is_frozen` is set the cost
//! fields are immutable and recomputation is forbidden. There is no way back
//! from frozen; re-pricing requires a fresh clone.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Batch database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    /// Unique identifier for the batch
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Part this batch produces
    pub part_id: i64,
    /// Number of units in the batch
    pub quantity: i32,
    /// Material cost per unit
    pub material_cost: f64,
    /// Machining cost per unit
    pub machining_cost: f64,
    /// Setup cost per unit (amortized across the batch)
    pub setup_cost: f64,
    /// External (subcontracted) cost per unit
    pub coop_cost: f64,
    /// Sum of the four cost components, per unit
    pub unit_cost: f64,
    /// Unit price after margin
    pub unit_price: f64,
    /// Batch price: unit price × quantity
    pub total_price: f64,
    /// Material share of unit cost, percent rounded to 0.1
    pub material_percent: f64,
    /// Machining share of unit cost, percent rounded to 0.1
    pub machining_percent: f64,
    /// Setup share of unit cost, percent rounded to 0.1
    pub setup_percent: f64,
    /// Coop share of unit cost, percent rounded to 0.1
    pub coop_percent: f64,
    /// Margin applied when this batch was priced, in percent
    pub margin_percent: f64,
    /// Freeze flag - once true, cost fields are immutable
    pub is_frozen: bool,
    /// When the batch was frozen, None while draft
    pub frozen_at: Option<DateTime<Utc>>,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Defines relationships between Batch and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each batch belongs to exactly one part
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
    /// One batch may appear on many quote items
    #[sea_orm(has_many = "super::quote_item::Entity")]
    QuoteItems,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
