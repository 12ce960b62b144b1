//! Frozen batch snapshots.
//!
//! When a quote is sent, the aggregator's output for each batch is copied
//! into an immutable JSON snapshot stored on the quote item. From then on the
//! snapshot - never a live recomputation - is the source of truth for that
//! line, so later changes to price tiers, machine rates, or the part itself
//! cannot alter an already-sent quote.

use crate::{
    entities::{batch, material_input, operation, quote_item},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

/// Immutable copy of a batch's pricing at freeze time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    /// Source batch
    pub batch_id: i64,
    /// Part the batch produces
    pub part_id: i64,
    /// Units in the batch
    pub quantity: i32,
    /// Material cost per unit
    pub material_cost: f64,
    /// Machining cost per unit
    pub machining_cost: f64,
    /// Setup cost per unit
    pub setup_cost: f64,
    /// Coop cost per unit
    pub coop_cost: f64,
    /// Sum of the four components
    pub unit_cost: f64,
    /// Unit price after margin
    pub unit_price: f64,
    /// Batch total
    pub total_price: f64,
    /// Material share of unit cost, percent
    pub material_percent: f64,
    /// Machining share of unit cost, percent
    pub machining_percent: f64,
    /// Setup share of unit cost, percent
    pub setup_percent: f64,
    /// Coop share of unit cost, percent
    pub coop_percent: f64,
    /// Margin applied at freeze time, percent
    pub margin_percent: f64,
    /// Material inputs that fed the calculation
    pub material_input_ids: Vec<i64>,
    /// Machines that fed the calculation
    pub machine_ids: Vec<i64>,
    /// When the snapshot was taken
    pub frozen_at: DateTime<Utc>,
}

impl BatchSnapshot {
    /// Captures a batch's stored pricing plus the identifiers of the
    /// reference rows that produced it.
    pub async fn capture<C>(db: &C, batch: &batch::Model) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let material_input_ids = material_input::Entity::find()
            .filter(material_input::Column::PartId.eq(batch.part_id))
            .filter(material_input::Column::DeletedAt.is_null())
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let mut machine_ids: Vec<i64> = operation::Entity::find()
            .filter(operation::Column::PartId.eq(batch.part_id))
            .filter(operation::Column::DeletedAt.is_null())
            .all(db)
            .await?
            .into_iter()
            .map(|op| op.machine_id)
            .collect();
        machine_ids.sort_unstable();
        machine_ids.dedup();

        Ok(Self {
            batch_id: batch.id,
            part_id: batch.part_id,
            quantity: batch.quantity,
            material_cost: batch.material_cost,
            machining_cost: batch.machining_cost,
            setup_cost: batch.setup_cost,
            coop_cost: batch.coop_cost,
            unit_cost: batch.unit_cost,
            unit_price: batch.unit_price,
            total_price: batch.total_price,
            material_percent: batch.material_percent,
            machining_percent: batch.machining_percent,
            setup_percent: batch.setup_percent,
            coop_percent: batch.coop_percent,
            margin_percent: batch.margin_percent,
            material_input_ids,
            machine_ids,
            frozen_at: batch.frozen_at.unwrap_or_else(Utc::now),
        })
    }

    /// Serializes the snapshot for the quote item's JSON column.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses the snapshot stored on a quote item, `None` while the quote is
    /// still draft.
    pub fn from_item(item: &quote_item::Model) -> Result<Option<Self>> {
        item.snapshot
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()).map_err(Into::into))
            .transpose()
    }
}

/// Unit price of a quote item: the snapshot once the quote was sent, the
/// denormalized draft price before that.
pub fn effective_unit_price(item: &quote_item::Model) -> Result<f64> {
    Ok(BatchSnapshot::from_item(item)?.map_or(item.unit_price, |s| s.unit_price))
}
