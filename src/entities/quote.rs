//! Quote entity - A customer-facing price quote.
//!
//! A quote is assembled in `draft` status and becomes immutable on send:
//! sending freezes every referenced batch and snapshots its prices onto the
//! quote items, so later edits to parts, tiers, or machine rates never alter
//! an already-sent quote.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote status values stored in the `status` column.
pub const STATUS_DRAFT: &str = "draft";
/// Status after a successful send; the quote is immutable from here on.
pub const STATUS_SENT: &str = "sent";

/// Quote database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    /// Unique identifier for the quote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer-facing quote number (e.g., "Q-2024-042")
    pub quote_number: String,
    /// Customer name
    pub customer: String,
    /// Lifecycle status: "draft" or "sent"
    pub status: String,
    /// Total price, must equal the sum of item totals at send time
    pub total_price: f64,
    /// Optimistic lock counter, incremented on every update
    pub version: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When the quote was sent, None while draft
    pub sent_at: Option<DateTime<Utc>>,
}

/// Defines relationships between Quote and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One quote has many line items
    #[sea_orm(has_many = "super::quote_item::Entity")]
    Items,
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
