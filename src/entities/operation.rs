//! Operation entity - One machining step of a part's process plan.
//!
//! Times are nullable: an estimator may save an operation before timing it.
//! Nulls are coerced to zero at the calculation boundary, never inside
//! arithmetic. Soft-deleted operations are excluded from costing.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Operation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    /// Unique identifier for the operation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning part
    pub part_id: i64,
    /// Machine this operation runs on
    pub machine_id: i64,
    /// Short description (e.g., "turn OD", "drill 4x M6")
    pub description: String,
    /// Machining time per unit in minutes, None when not yet estimated
    pub time_minutes: Option<f64>,
    /// One-off setup time in minutes, None when not yet estimated
    pub setup_time_minutes: Option<f64>,
    /// Ordering of operations within the process plan
    pub sequence: i32,
    /// Soft delete timestamp - set when the operation is removed from the part
    pub deleted_at: Option<DateTime<Utc>>,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
}

/// Defines relationships between operation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each operation belongs to exactly one part
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id"
    )]
    Part,
    /// Each operation runs on exactly one machine
    #[sea_orm(
        belongs_to = "super::machine::Entity",
        from = "Column::MachineId",
        to = "super::machine::Column::Id"
    )]
    Machine,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl Related<super::machine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
