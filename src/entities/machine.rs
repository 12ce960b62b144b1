//! Machine entity - A workshop machine with its two hourly rates.
//!
//! Machining time is billed at `hourly_rate_operation`, setup time at the
//! (typically lower) `hourly_rate_setup`. The two rates are never
//! interchangeable in the costing pipeline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Machine database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    /// Unique identifier for the machine
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "CNC lathe DMG MORI")
    pub name: String,
    /// Hourly rate applied to machining (operation) time
    pub hourly_rate_operation: f64,
    /// Hourly rate applied to setup time
    pub hourly_rate_setup: f64,
    /// Soft delete flag - if true, machine is hidden but data is preserved
    pub is_deleted: bool,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
}

/// Defines relationships between Machine and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One machine is referenced by many operations
    #[sea_orm(has_many = "super::operation::Entity")]
    Operations,
}

impl Related<super::operation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
