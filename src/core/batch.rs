//! Batch lifecycle - creation, quantity changes, freezing, cloning.
//!
//! A batch is draft (editable, repriced on any input change) or frozen
//! (immutable). The transition draft→frozen happens when a quote is sent;
//! frozen→draft does not exist - re-pricing a frozen batch means cloning it
//! into a fresh draft. All mutations are guarded by the batch's version
//! counter; a stale version fails with a conflict and leaves the row intact.

use crate::{
    cache::ReferenceCache,
    config::settings::PricingSettings,
    core::recalc,
    entities::{batch, part},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::info;

/// Retrieves a batch by id.
pub async fn get_batch_by_id<C>(db: &C, batch_id: i64) -> Result<Option<batch::Model>>
where
    C: ConnectionTrait,
{
    batch::Entity::find_by_id(batch_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a draft batch for a part and prices it immediately.
///
/// # Errors
/// Rejects `quantity ≤ 0` with [`Error::InvalidQuantity`]; unknown parts
/// fail with [`Error::PartNotFound`].
pub async fn create_batch(
    db: &DatabaseConnection,
    cache: &ReferenceCache,
    settings: &PricingSettings,
    part_id: i64,
    quantity: i32,
) -> Result<batch::Model> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let part = part::Entity::find_by_id(part_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartNotFound { id: part_id })?;

    let prices = recalc::price_batch(&txn, cache, settings, &part, quantity).await?;
    let mut active = batch::ActiveModel {
        part_id: Set(part_id),
        quantity: Set(quantity),
        margin_percent: Set(part.margin_percent),
        is_frozen: Set(false),
        frozen_at: Set(None),
        version: Set(1),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    recalc::apply_prices(&mut active, &prices);

    let created = active.insert(&txn).await?;
    txn.commit().await?;
    info!(batch_id = created.id, part_id, quantity, "created batch");
    Ok(created)
}

/// Changes a batch's quantity and reprices it, all in one transaction.
///
/// # Errors
/// [`Error::BatchFrozen`] for frozen batches, [`Error::VersionConflict`] when
/// `expected_version` is stale (the stored row is left unchanged),
/// [`Error::InvalidQuantity`] for `quantity ≤ 0`.
pub async fn update_batch_quantity(
    db: &DatabaseConnection,
    cache: &ReferenceCache,
    settings: &PricingSettings,
    batch_id: i64,
    quantity: i32,
    expected_version: i32,
) -> Result<batch::Model> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let stored = batch::Entity::find_by_id(batch_id)
        .one(&txn)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })?;
    if stored.is_frozen {
        return Err(Error::BatchFrozen { id: batch_id });
    }

    let part = part::Entity::find_by_id(stored.part_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartNotFound { id: stored.part_id })?;

    let prices = recalc::price_batch(&txn, cache, settings, &part, quantity).await?;
    let mut active = batch::ActiveModel {
        quantity: Set(quantity),
        version: Set(expected_version + 1),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    recalc::apply_prices(&mut active, &prices);

    // The version filter makes the write race-safe: a concurrent update that
    // bumped the version since our read leaves zero rows affected.
    let result = batch::Entity::update_many()
        .set(active)
        .filter(batch::Column::Id.eq(batch_id))
        .filter(batch::Column::Version.eq(expected_version))
        .filter(batch::Column::IsFrozen.eq(false))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::VersionConflict {
            entity: "batch",
            id: batch_id,
            expected: expected_version,
            actual: stored.version,
        });
    }

    let updated = batch::Entity::find_by_id(batch_id)
        .one(&txn)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })?;
    txn.commit().await?;
    Ok(updated)
}

/// Marks a batch frozen under optimistic locking.
///
/// An already-frozen batch is returned as-is (freezing is idempotent at the
/// quote-send level); a draft batch whose version is stale conflicts.
pub async fn freeze_batch<C>(db: &C, batch_id: i64, expected_version: i32) -> Result<batch::Model>
where
    C: ConnectionTrait,
{
    let stored = batch::Entity::find_by_id(batch_id)
        .one(db)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })?;
    if stored.is_frozen {
        return Ok(stored);
    }

    let result = batch::Entity::update_many()
        .set(batch::ActiveModel {
            is_frozen: Set(true),
            frozen_at: Set(Some(Utc::now())),
            version: Set(expected_version + 1),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .filter(batch::Column::Id.eq(batch_id))
        .filter(batch::Column::Version.eq(expected_version))
        .filter(batch::Column::IsFrozen.eq(false))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::VersionConflict {
            entity: "batch",
            id: batch_id,
            expected: expected_version,
            actual: stored.version,
        });
    }

    batch::Entity::find_by_id(batch_id)
        .one(db)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })
}

/// Clones a batch into a fresh draft priced from the part's current inputs.
///
/// The only way to "re-price" a frozen batch: the original stays frozen, the
/// clone starts a new draft life.
pub async fn clone_batch(
    db: &DatabaseConnection,
    cache: &ReferenceCache,
    settings: &PricingSettings,
    batch_id: i64,
) -> Result<batch::Model> {
    let source = batch::Entity::find_by_id(batch_id)
        .one(db)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })?;

    create_batch(db, cache, settings, source.part_id, source.quantity).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_batch_prices_immediately() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        let batch = create_batch(db, cache, settings, fixture.part.id, 10).await?;
        assert_eq!(batch.quantity, 10);
        assert!(batch.unit_cost > 0.0);
        assert!(!batch.is_frozen);
        assert_eq!(batch.version, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_batch_rejects_zero_quantity() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;

        let err = create_batch(
            &fixture.db,
            &fixture.cache,
            &fixture.settings,
            fixture.part.id,
            0,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { quantity: 0 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_reprices() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        let batch = create_batch(db, cache, settings, fixture.part.id, 5).await?;
        let updated =
            update_batch_quantity(db, cache, settings, batch.id, 50, batch.version).await?;

        assert_eq!(updated.quantity, 50);
        assert_eq!(updated.version, batch.version + 1);
        // Setup amortized over ten times the units
        assert!(updated.setup_cost < batch.setup_cost);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_version_conflict_leaves_row_unchanged() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        // Stored version is 4 after three updates
        let batch = create_batch(db, cache, settings, fixture.part.id, 5).await?;
        let batch = update_batch_quantity(db, cache, settings, batch.id, 6, 1).await?;
        let batch = update_batch_quantity(db, cache, settings, batch.id, 7, 2).await?;
        let batch = update_batch_quantity(db, cache, settings, batch.id, 8, 3).await?;
        assert_eq!(batch.version, 4);

        // Submitting version=3 against stored version=4 conflicts
        let err = update_batch_quantity(db, cache, settings, batch.id, 99, 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::VersionConflict {
                entity: "batch",
                expected: 3,
                actual: 4,
                ..
            }
        ));

        let stored = get_batch_by_id(db, batch.id).await?.unwrap();
        assert_eq!(stored.quantity, 8);
        assert_eq!(stored.version, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_frozen_batch_rejects_quantity_update() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        let batch = create_batch(db, cache, settings, fixture.part.id, 10).await?;
        let frozen = freeze_batch(db, batch.id, batch.version).await?;
        assert!(frozen.is_frozen);
        assert!(frozen.frozen_at.is_some());

        let err = update_batch_quantity(db, cache, settings, batch.id, 20, frozen.version)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BatchFrozen { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_freeze_is_idempotent() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        let batch = create_batch(db, cache, settings, fixture.part.id, 10).await?;
        let frozen = freeze_batch(db, batch.id, batch.version).await?;
        let again = freeze_batch(db, batch.id, frozen.version).await?;
        assert_eq!(frozen, again);
        Ok(())
    }

    #[tokio::test]
    async fn test_clone_frozen_batch_starts_fresh_draft() -> crate::errors::Result<()> {
        let fixture = setup_costing_fixture().await?;
        let (db, cache, settings) = (&fixture.db, &fixture.cache, &fixture.settings);

        let batch = create_batch(db, cache, settings, fixture.part.id, 10).await?;
        let frozen = freeze_batch(db, batch.id, batch.version).await?;

        let clone = clone_batch(db, cache, settings, frozen.id).await?;
        assert_ne!(clone.id, frozen.id);
        assert_eq!(clone.quantity, frozen.quantity);
        assert!(!clone.is_frozen);
        assert_eq!(clone.version, 1);
        Ok(())
    }
}
