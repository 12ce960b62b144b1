//! Machining/setup cost calculator.
//!
//! Converts operation times (minutes) and machine hourly rates into per-unit
//! costs. Machining time is billed at the machine's operation rate; setup time
//! at its dedicated setup rate, amortized across the batch quantity. Times are
//! nullable and coerced to zero through [`coalesce_numeric`] at this boundary,
//! never deeper in the arithmetic.

use crate::{
    cache::ReferenceCache,
    entities::{machine, operation},
    errors::{Error, Result},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::warn;

/// Normalizes a nullable numeric field to a number, defaulting to 0.
///
/// The single place where "no time recorded yet" becomes arithmetic-safe;
/// callers must not scatter ad-hoc `unwrap_or` coercions.
#[must_use]
pub fn coalesce_numeric(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Machining cost per unit: `time_minutes / 60 × hourly_rate_operation`.
#[must_use]
pub fn machining_cost_per_unit(time_minutes: Option<f64>, hourly_rate_operation: f64) -> f64 {
    coalesce_numeric(time_minutes) / 60.0 * hourly_rate_operation
}

/// Setup cost per unit: `(setup_minutes / 60 × hourly_rate_setup) / quantity`.
///
/// Setup is paid once per batch and amortized across its units. A
/// non-positive quantity short-circuits to 0 instead of dividing.
#[must_use]
pub fn setup_cost_per_unit(
    setup_minutes: Option<f64>,
    hourly_rate_setup: f64,
    quantity: i32,
) -> f64 {
    if quantity <= 0 {
        return 0.0;
    }
    coalesce_numeric(setup_minutes) / 60.0 * hourly_rate_setup / f64::from(quantity)
}

/// Per-unit machining and setup cost of a whole process plan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MachiningCosts {
    /// Machining cost per unit, summed over operations
    pub machining_cost: f64,
    /// Amortized setup cost per unit, summed over operations
    pub setup_cost: f64,
}

/// Sums machining and setup costs over a part's non-deleted operations.
///
/// Machines are resolved through the injected [`ReferenceCache`]. An
/// operation referencing a missing (or deleted) machine contributes zero and
/// is logged - incomplete reference data must not block saving a part.
pub async fn part_machining_costs<C>(
    db: &C,
    cache: &ReferenceCache,
    part_id: i64,
    quantity: i32,
) -> Result<MachiningCosts>
where
    C: ConnectionTrait,
{
    let operations = operation::Entity::find()
        .filter(operation::Column::PartId.eq(part_id))
        .filter(operation::Column::DeletedAt.is_null())
        .order_by_asc(operation::Column::Sequence)
        .all(db)
        .await?;

    let machines = cache.machines(db).await?;

    let mut costs = MachiningCosts::default();
    for op in &operations {
        let Some(machine) = machines.get(&op.machine_id) else {
            warn!(
                operation_id = op.id,
                machine_id = op.machine_id,
                "operation references missing machine, priced at 0"
            );
            continue;
        };
        costs.machining_cost +=
            machining_cost_per_unit(op.time_minutes, machine.hourly_rate_operation);
        costs.setup_cost +=
            setup_cost_per_unit(op.setup_time_minutes, machine.hourly_rate_setup, quantity);
    }
    Ok(costs)
}

/// Updates a machine's hourly rates under optimistic locking and invalidates
/// the machine cache.
///
/// # Errors
/// Returns [`Error::VersionConflict`] when `expected_version` no longer
/// matches the stored row, [`Error::MachineNotFound`] when the id is unknown.
pub async fn update_machine_rates(
    db: &sea_orm::DatabaseConnection,
    cache: &ReferenceCache,
    machine_id: i64,
    hourly_rate_operation: f64,
    hourly_rate_setup: f64,
    expected_version: i32,
) -> Result<machine::Model> {
    let result = machine::Entity::update_many()
        .set(machine::ActiveModel {
            hourly_rate_operation: Set(hourly_rate_operation),
            hourly_rate_setup: Set(hourly_rate_setup),
            version: Set(expected_version + 1),
            ..Default::default()
        })
        .filter(machine::Column::Id.eq(machine_id))
        .filter(machine::Column::Version.eq(expected_version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // Zero rows: distinguish a stale version from a missing machine.
        let stored = machine::Entity::find_by_id(machine_id)
            .one(db)
            .await?
            .ok_or(Error::MachineNotFound { id: machine_id })?;
        return Err(Error::VersionConflict {
            entity: "machine",
            id: machine_id,
            expected: expected_version,
            actual: stored.version,
        });
    }

    cache.invalidate_machines().await;

    machine::Entity::find_by_id(machine_id)
        .one(db)
        .await?
        .ok_or(Error::MachineNotFound { id: machine_id })
}
