//! Shared test utilities for GESTIMA.
//!
//! Helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults, plus a fully wired costing fixture
//! (part + material input + tiers + operation + machine) for pipeline tests.

use crate::{
    cache::ReferenceCache,
    config::settings::PricingSettings,
    core::part::StockDimensions,
    entities::{
        self, StockShape, batch, machine, material_input, material_price_category,
        material_price_tier, operation,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::time::Duration;

/// Creates an in-memory SQLite database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    // Costing deliberately tolerates dangling machine references (missing
    // machine => operation priced at 0), and tests construct such rows
    // directly; the generated schema's foreign keys would reject them.
    sea_orm::ConnectionTrait::execute_unprepared(&db, "PRAGMA foreign_keys = OFF;").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A reference cache with a long TTL, suitable for single-test lifetimes.
#[must_use]
pub fn test_cache() -> ReferenceCache {
    ReferenceCache::new(Duration::from_secs(3600))
}

/// Builds an unsaved material input model for pure geometry tests.
///
/// Defaults: no dimensions, 1 piece per part, steel density, no category.
/// The closure customizes the fields the test cares about.
pub fn material_input_model(
    shape: StockShape,
    customize: impl FnOnce(&mut material_input::Model),
) -> material_input::Model {
    let mut model = material_input::Model {
        id: 1,
        part_id: 1,
        shape,
        diameter_mm: None,
        length_mm: None,
        width_mm: None,
        thickness_mm: None,
        wall_thickness_mm: None,
        quantity_per_part: 1,
        density_kg_cm3: 0.00785,
        price_category_id: None,
        deleted_at: None,
        version: 1,
    };
    customize(&mut model);
    model
}

/// Builds an unsaved price tier model for pure tier-lookup tests.
#[must_use]
pub fn tier_model(
    id: i64,
    min_weight_kg: f64,
    max_weight_kg: Option<f64>,
    price_per_kg: f64,
) -> material_price_tier::Model {
    material_price_tier::Model {
        id,
        category_id: 1,
        min_weight_kg,
        max_weight_kg,
        price_per_kg,
    }
}

/// Creates a test part with sensible defaults.
///
/// # Defaults
/// * `part_number`: "GST-100"
/// * `coop_price_per_unit`: 0 (no subcontracting)
/// * `margin_percent`: 15
pub async fn create_test_part(db: &DatabaseConnection) -> Result<entities::part::Model> {
    crate::core::part::create_part(
        db,
        "GST-100".to_string(),
        "Test part".to_string(),
        0.0,
        15.0,
    )
    .await
}

/// Sets up a complete test environment with a part.
/// Returns (db, part) for common test scenarios.
pub async fn setup_with_part() -> Result<(DatabaseConnection, entities::part::Model)> {
    let db = setup_test_db().await?;
    let part = create_test_part(&db).await?;
    Ok((db, part))
}

/// Creates a test machine with operation rate 1200/h and setup rate 600/h.
pub async fn create_test_machine(
    db: &DatabaseConnection,
    name: &str,
) -> Result<machine::Model> {
    let model = machine::ActiveModel {
        name: Set(name.to_string()),
        hourly_rate_operation: Set(1200.0),
        hourly_rate_setup: Set(600.0),
        is_deleted: Set(false),
        version: Set(1),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates a test operation on a machine with the given times.
pub async fn create_test_operation(
    db: &DatabaseConnection,
    part_id: i64,
    machine_id: i64,
    time_minutes: Option<f64>,
    setup_time_minutes: Option<f64>,
) -> Result<operation::Model> {
    crate::core::part::create_operation(
        db,
        part_id,
        machine_id,
        "Test operation".to_string(),
        time_minutes,
        setup_time_minutes,
        10,
    )
    .await
}

/// Soft-deletes a test operation directly, bypassing version checks.
pub async fn soft_delete_test_operation(db: &DatabaseConnection, operation_id: i64) -> Result<()> {
    let stored = operation::Entity::find_by_id(operation_id)
        .one(db)
        .await?
        .expect("test operation must exist");
    let mut active: operation::ActiveModel = stored.into();
    active.deleted_at = Set(Some(Utc::now()));
    active.update(db).await?;
    Ok(())
}

/// Creates a price category with the given `(min, max, price_per_kg)` tiers.
pub async fn create_test_category_with_tiers(
    db: &DatabaseConnection,
    tiers: &[(f64, Option<f64>, f64)],
) -> Result<material_price_category::Model> {
    let category = material_price_category::ActiveModel {
        name: Set("Steel 11SMn30".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for &(min_weight_kg, max_weight_kg, price_per_kg) in tiers {
        material_price_tier::ActiveModel {
            category_id: Set(category.id),
            min_weight_kg: Set(min_weight_kg),
            max_weight_kg: Set(max_weight_kg),
            price_per_kg: Set(price_per_kg),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(category)
}

/// Creates a steel round-bar material input (d=16mm, L=100mm) on a part.
pub async fn create_test_material_input(
    db: &DatabaseConnection,
    part_id: i64,
    price_category_id: Option<i64>,
) -> Result<material_input::Model> {
    crate::core::part::create_material_input(
        db,
        part_id,
        StockShape::RoundBar,
        StockDimensions {
            diameter_mm: Some(16.0),
            length_mm: Some(100.0),
            ..Default::default()
        },
        1,
        0.00785,
        price_category_id,
    )
    .await
}

/// Blanks out a material input's length to make its geometry invalid.
pub async fn clear_test_input_length(db: &DatabaseConnection, input_id: i64) -> Result<()> {
    let stored = material_input::Entity::find_by_id(input_id)
        .one(db)
        .await?
        .expect("test material input must exist");
    let mut active: material_input::ActiveModel = stored.into();
    active.length_mm = Set(None);
    active.update(db).await?;
    Ok(())
}

/// Inserts an unpriced draft batch directly (all cost fields zero).
/// Use `core::batch::create_batch` when the test wants a priced one.
pub async fn create_test_batch(
    db: &DatabaseConnection,
    part_id: i64,
    quantity: i32,
) -> Result<batch::Model> {
    let model = batch::ActiveModel {
        part_id: Set(part_id),
        quantity: Set(quantity),
        material_cost: Set(0.0),
        machining_cost: Set(0.0),
        setup_cost: Set(0.0),
        coop_cost: Set(0.0),
        unit_cost: Set(0.0),
        unit_price: Set(0.0),
        total_price: Set(0.0),
        material_percent: Set(0.0),
        machining_percent: Set(0.0),
        setup_percent: Set(0.0),
        coop_percent: Set(0.0),
        margin_percent: Set(15.0),
        is_frozen: Set(false),
        frozen_at: Set(None),
        version: Set(1),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// A fully wired costing scenario: one part with a steel round-bar input
/// priced in two weight tiers and one operation on a machine.
pub struct CostingFixture {
    /// In-memory database with all tables
    pub db: DatabaseConnection,
    /// Reference cache with a long TTL
    pub cache: ReferenceCache,
    /// Default pricing settings (15% margin, no coop floor)
    pub settings: PricingSettings,
    /// The part under test (margin 15%, no coop)
    pub part: entities::part::Model,
    /// The machine its operation runs on (1200/600 per hour)
    pub machine: machine::Model,
    /// The material price category (45/kg below 10 kg, 38/kg above)
    pub category: material_price_category::Model,
}

/// Sets up the standard costing fixture used by pipeline tests.
pub async fn setup_costing_fixture() -> Result<CostingFixture> {
    let (db, part) = setup_with_part().await?;
    let category =
        create_test_category_with_tiers(&db, &[(0.0, Some(10.0), 45.0), (10.0, None, 38.0)])
            .await?;
    create_test_material_input(&db, part.id, Some(category.id)).await?;
    let machine = create_test_machine(&db, "CNC lathe").await?;
    create_test_operation(&db, part.id, machine.id, Some(10.0), Some(30.0)).await?;

    Ok(CostingFixture {
        db,
        cache: test_cache(),
        settings: PricingSettings::default(),
        part,
        machine,
        category,
    })
}
