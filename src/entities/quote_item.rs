//! Quote item entity - One line of a quote, referencing a priced batch.
//!
//! `part_number`, `unit_price`, and `total_price` are denormalized at creation
//! time so later edits to the part do not retroactively change the quote. The
//! `snapshot` column is filled at send time with the frozen batch's full cost
//! breakdown and is the source of truth for a sent quote.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quote_items")]
pub struct Model {
    /// Unique identifier for the quote item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning quote
    pub quote_id: i64,
    /// Batch this line prices
    pub batch_id: i64,
    /// Part number copied from the part at item creation
    pub part_number: String,
    /// Quantity copied from the batch at item creation
    pub quantity: i32,
    /// Unit price copied from the batch at item creation
    pub unit_price: f64,
    /// Line total: unit price × quantity
    pub total_price: f64,
    /// Frozen batch snapshot (JSON), written at send time
    pub snapshot: Option<Json>,
}

/// Defines relationships between quote item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to exactly one quote
    #[sea_orm(
        belongs_to = "super::quote::Entity",
        from = "Column::QuoteId",
        to = "super::quote::Column::Id"
    )]
    Quote,
    /// Each item prices exactly one batch
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
