//! Part business logic - parts, material inputs, and operations.
//!
//! Thin CRUD over the rows the costing pipeline consumes. Every mutation here
//! changes costing inputs, so callers (the router layer) must follow up with
//! [`crate::core::recalc::recalculate_part_batches`] - one atomic call per
//! part, never one call per batch.

use crate::{
    entities::{StockShape, material_input, operation, part},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

/// Retrieves a part by id.
pub async fn get_part_by_id<C>(db: &C, part_id: i64) -> Result<Option<part::Model>>
where
    C: ConnectionTrait,
{
    part::Entity::find_by_id(part_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a part by its customer-facing part number.
pub async fn get_part_by_number<C>(db: &C, part_number: &str) -> Result<Option<part::Model>>
where
    C: ConnectionTrait,
{
    part::Entity::find()
        .filter(part::Column::PartNumber.eq(part_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new part with validation.
///
/// # Errors
/// Rejects an empty part number or a negative margin via [`Error::Config`].
pub async fn create_part<C>(
    db: &C,
    part_number: String,
    name: String,
    coop_price_per_unit: f64,
    margin_percent: f64,
) -> Result<part::Model>
where
    C: ConnectionTrait,
{
    if part_number.trim().is_empty() {
        return Err(Error::Config {
            message: "Part number cannot be empty".to_string(),
        });
    }
    if margin_percent < 0.0 {
        return Err(Error::Config {
            message: format!("Margin percent cannot be negative: {margin_percent}"),
        });
    }

    let now = Utc::now();
    let model = part::ActiveModel {
        part_number: Set(part_number.trim().to_string()),
        name: Set(name),
        coop_price_per_unit: Set(coop_price_per_unit.max(0.0)),
        margin_percent: Set(margin_percent),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Adds a material input to a part. Recompute-trigger site.
pub async fn create_material_input<C>(
    db: &C,
    part_id: i64,
    shape: StockShape,
    dimensions: StockDimensions,
    quantity_per_part: i32,
    density_kg_cm3: f64,
    price_category_id: Option<i64>,
) -> Result<material_input::Model>
where
    C: ConnectionTrait,
{
    if quantity_per_part <= 0 {
        return Err(Error::InvalidQuantity {
            quantity: quantity_per_part,
        });
    }

    let model = material_input::ActiveModel {
        part_id: Set(part_id),
        shape: Set(shape),
        diameter_mm: Set(dimensions.diameter_mm),
        length_mm: Set(dimensions.length_mm),
        width_mm: Set(dimensions.width_mm),
        thickness_mm: Set(dimensions.thickness_mm),
        wall_thickness_mm: Set(dimensions.wall_thickness_mm),
        quantity_per_part: Set(quantity_per_part),
        density_kg_cm3: Set(density_kg_cm3),
        price_category_id: Set(price_category_id),
        deleted_at: Set(None),
        version: Set(1),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Shape-specific dimensions of a stock position, all in mm.
///
/// Which fields are required depends on the shape; the geometry calculator
/// validates at calculation time, not at insert time, so an estimator can
/// save incomplete drafts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockDimensions {
    pub diameter_mm: Option<f64>,
    pub length_mm: Option<f64>,
    pub width_mm: Option<f64>,
    pub thickness_mm: Option<f64>,
    pub wall_thickness_mm: Option<f64>,
}

/// Soft-deletes a material input under optimistic locking.
/// Recompute-trigger site.
pub async fn soft_delete_material_input<C>(
    db: &C,
    input_id: i64,
    expected_version: i32,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = material_input::Entity::update_many()
        .set(material_input::ActiveModel {
            deleted_at: Set(Some(Utc::now())),
            version: Set(expected_version + 1),
            ..Default::default()
        })
        .filter(material_input::Column::Id.eq(input_id))
        .filter(material_input::Column::Version.eq(expected_version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let stored = material_input::Entity::find_by_id(input_id)
            .one(db)
            .await?
            .ok_or(Error::MaterialInputNotFound { id: input_id })?;
        return Err(Error::VersionConflict {
            entity: "material_input",
            id: input_id,
            expected: expected_version,
            actual: stored.version,
        });
    }
    Ok(())
}

/// Adds a machining operation to a part. Recompute-trigger site.
pub async fn create_operation<C>(
    db: &C,
    part_id: i64,
    machine_id: i64,
    description: String,
    time_minutes: Option<f64>,
    setup_time_minutes: Option<f64>,
    sequence: i32,
) -> Result<operation::Model>
where
    C: ConnectionTrait,
{
    let model = operation::ActiveModel {
        part_id: Set(part_id),
        machine_id: Set(machine_id),
        description: Set(description),
        time_minutes: Set(time_minutes),
        setup_time_minutes: Set(setup_time_minutes),
        sequence: Set(sequence),
        deleted_at: Set(None),
        version: Set(1),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Soft-deletes an operation under optimistic locking. Recompute-trigger site.
pub async fn soft_delete_operation<C>(
    db: &C,
    operation_id: i64,
    expected_version: i32,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = operation::Entity::update_many()
        .set(operation::ActiveModel {
            deleted_at: Set(Some(Utc::now())),
            version: Set(expected_version + 1),
            ..Default::default()
        })
        .filter(operation::Column::Id.eq(operation_id))
        .filter(operation::Column::Version.eq(expected_version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let stored = operation::Entity::find_by_id(operation_id)
            .one(db)
            .await?
            .ok_or(Error::OperationNotFound { id: operation_id })?;
        return Err(Error::VersionConflict {
            entity: "operation",
            id: operation_id,
            expected: expected_version,
            actual: stored.version,
        });
    }
    Ok(())
}
