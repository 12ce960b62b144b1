//! Part entity - A manufactured part being quoted.
//!
//! A part owns its material inputs, operations, and batches. Pricing policy
//! (margin, subcontracting price) lives here so every batch of the part is
//! priced consistently.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Part database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    /// Unique identifier for the part
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer-facing part number (e.g., "GST-2024-0815")
    pub part_number: String,
    /// Human-readable name of the part
    pub name: String,
    /// Per-unit price of external (subcontracted) processing, 0 when none
    pub coop_price_per_unit: f64,
    /// Margin applied on top of unit cost, in percent
    pub margin_percent: f64,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Defines relationships between Part and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One part has many material inputs
    #[sea_orm(has_many = "super::material_input::Entity")]
    MaterialInputs,
    /// One part has many machining operations
    #[sea_orm(has_many = "super::operation::Entity")]
    Operations,
    /// One part has many priced batches
    #[sea_orm(has_many = "super::batch::Entity")]
    Batches,
}

impl Related<super::material_input::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialInputs.def()
    }
}

impl Related<super::operation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
