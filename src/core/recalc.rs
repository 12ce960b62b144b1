//! Atomic recompute of all batches for a part.
//!
//! The single server-side recompute trigger: whenever a part's material
//! inputs, operations, or batch quantities change, the router layer calls
//! [`recalculate_part_batches`] once. All of the part's draft batches are
//! repriced inside one transaction - frozen batches are skipped, and any
//! failure rolls back every row so cost fields are never partially persisted.
//! Recomputing from unchanged inputs yields bit-identical prices.

use crate::{
    cache::ReferenceCache,
    config::settings::PricingSettings,
    core::{machining, material, pricing, pricing::BatchPrices},
    entities::{batch, part},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

/// Prices one batch quantity of a part from its current inputs.
///
/// Composes the pipeline: material cost (geometry + tiered pricing),
/// machining/setup costs (times × machine rates), coop cost with the
/// minimum-price floor, aggregated with the part's margin.
pub async fn price_batch<C>(
    db: &C,
    cache: &ReferenceCache,
    settings: &PricingSettings,
    part: &part::Model,
    quantity: i32,
) -> Result<BatchPrices>
where
    C: ConnectionTrait,
{
    let material_cost = material::part_material_cost(db, part.id, quantity).await?;
    let machining_costs = machining::part_machining_costs(db, cache, part.id, quantity).await?;
    let coop_cost = pricing::coop_cost_per_unit(
        part.coop_price_per_unit,
        quantity,
        settings.coop_minimum_price,
    );

    Ok(pricing::calculate_batch_prices(
        material_cost,
        machining_costs.machining_cost,
        machining_costs.setup_cost,
        coop_cost,
        quantity,
        part.margin_percent,
    ))
}

/// Copies computed prices onto a batch's active model.
pub(crate) fn apply_prices(active: &mut batch::ActiveModel, prices: &BatchPrices) {
    active.material_cost = Set(prices.material_cost);
    active.machining_cost = Set(prices.machining_cost);
    active.setup_cost = Set(prices.setup_cost);
    active.coop_cost = Set(prices.coop_cost);
    active.unit_cost = Set(prices.unit_cost);
    active.unit_price = Set(prices.unit_price);
    active.total_price = Set(prices.total_price);
    active.material_percent = Set(prices.material_percent);
    active.machining_percent = Set(prices.machining_percent);
    active.setup_percent = Set(prices.setup_percent);
    active.coop_percent = Set(prices.coop_percent);
}

/// Recalculates all draft batches of a part in one transaction.
///
/// Returns every batch of the part, repriced where draft, untouched where
/// frozen. Idempotent: unchanged inputs produce identical cost fields.
///
/// # Errors
/// Returns [`Error::PartNotFound`] for an unknown part; any database failure
/// rolls the whole recalculation back.
pub async fn recalculate_part_batches(
    db: &DatabaseConnection,
    cache: &ReferenceCache,
    settings: &PricingSettings,
    part_id: i64,
) -> Result<Vec<batch::Model>> {
    let txn = db.begin().await?;

    let part = part::Entity::find_by_id(part_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?;

    let batches = batch::Entity::find()
        .filter(batch::Column::PartId.eq(part_id))
        .order_by_asc(batch::Column::Quantity)
        .all(&txn)
        .await?;

    let mut repriced = Vec::with_capacity(batches.len());
    let mut updated = 0usize;
    for b in batches {
        if b.is_frozen {
            debug!(batch_id = b.id, "skipping frozen batch");
            repriced.push(b);
            continue;
        }

        let prices = price_batch(&txn, cache, settings, &part, b.quantity).await?;
        let version = b.version;
        let mut active: batch::ActiveModel = b.into();
        apply_prices(&mut active, &prices);
        active.margin_percent = Set(part.margin_percent);
        active.version = Set(version + 1);
        active.updated_at = Set(Utc::now());
        repriced.push(active.update(&txn).await?);
        updated += 1;
    }

    txn.commit().await?;
    info!(part_id, updated, "recalculated part batches");
    Ok(repriced)
}
