//! Quote business logic - assembling and sending customer quotes.
//!
//! A draft quote collects items, each denormalizing the part number and the
//! batch's current prices at insert time. Sending is one transaction that
//! validates the total invariant, freezes every referenced batch, writes the
//! batch snapshots onto the items, and marks the quote sent; any failure
//! rolls all of it back.

use crate::{
    core::{batch as batch_ops, snapshot::BatchSnapshot},
    entities::{batch, part, quote, quote_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::info;

/// Tolerance for comparing monetary totals (half a cent / haléř).
const TOTAL_TOLERANCE: f64 = 0.005;

/// Retrieves a quote by id.
pub async fn get_quote_by_id<C>(db: &C, quote_id: i64) -> Result<Option<quote::Model>>
where
    C: ConnectionTrait,
{
    quote::Entity::find_by_id(quote_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all items of a quote.
pub async fn get_quote_items<C>(db: &C, quote_id: i64) -> Result<Vec<quote_item::Model>>
where
    C: ConnectionTrait,
{
    quote_item::Entity::find()
        .filter(quote_item::Column::QuoteId.eq(quote_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an empty draft quote.
pub async fn create_quote<C>(
    db: &C,
    quote_number: String,
    customer: String,
) -> Result<quote::Model>
where
    C: ConnectionTrait,
{
    if quote_number.trim().is_empty() {
        return Err(Error::Config {
            message: "Quote number cannot be empty".to_string(),
        });
    }

    let model = quote::ActiveModel {
        quote_number: Set(quote_number.trim().to_string()),
        customer: Set(customer),
        status: Set(quote::STATUS_DRAFT.to_string()),
        total_price: Set(0.0),
        version: Set(1),
        created_at: Set(Utc::now()),
        sent_at: Set(None),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Adds a batch to a draft quote, denormalizing the part number and the
/// batch's current prices onto the item, and refreshes the quote total.
///
/// # Errors
/// [`Error::QuoteAlreadySent`] for sent quotes, [`Error::BatchNotFound`] /
/// [`Error::PartNotFound`] for dangling references.
pub async fn add_quote_item(
    db: &DatabaseConnection,
    quote_id: i64,
    batch_id: i64,
) -> Result<quote_item::Model> {
    let txn = db.begin().await?;

    let quote = quote::Entity::find_by_id(quote_id)
        .one(&txn)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })?;
    if quote.status != quote::STATUS_DRAFT {
        return Err(Error::QuoteAlreadySent { id: quote_id });
    }

    let batch = batch::Entity::find_by_id(batch_id)
        .one(&txn)
        .await?
        .ok_or(Error::BatchNotFound { id: batch_id })?;
    let part = part::Entity::find_by_id(batch.part_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartNotFound { id: batch.part_id })?;

    let item = quote_item::ActiveModel {
        quote_id: Set(quote_id),
        batch_id: Set(batch_id),
        part_number: Set(part.part_number),
        quantity: Set(batch.quantity),
        unit_price: Set(batch.unit_price),
        total_price: Set(batch.total_price),
        snapshot: Set(None),
        ..Default::default()
    };
    let item = item.insert(&txn).await?;

    refresh_quote_total(&txn, &quote).await?;
    txn.commit().await?;
    Ok(item)
}

/// Recomputes a quote's total from its items under optimistic locking.
async fn refresh_quote_total<C>(db: &C, quote: &quote::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let items = get_quote_items(db, quote.id).await?;
    let total: f64 = items.iter().map(|i| i.total_price).sum();

    let result = quote::Entity::update_many()
        .set(quote::ActiveModel {
            total_price: Set(total),
            version: Set(quote.version + 1),
            ..Default::default()
        })
        .filter(quote::Column::Id.eq(quote.id))
        .filter(quote::Column::Version.eq(quote.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let stored = quote::Entity::find_by_id(quote.id)
            .one(db)
            .await?
            .ok_or(Error::QuoteNotFound { id: quote.id })?;
        return Err(Error::VersionConflict {
            entity: "quote",
            id: quote.id,
            expected: quote.version,
            actual: stored.version,
        });
    }
    Ok(())
}

/// Sends a quote: validates the total invariant, freezes every referenced
/// batch, snapshots each batch onto its item, and marks the quote sent.
///
/// One transaction end to end - a failure on any item rolls back every
/// freeze and snapshot.
///
/// # Errors
/// [`Error::QuoteAlreadySent`] when not draft, [`Error::QuoteTotalMismatch`]
/// when the stored total does not equal the sum of item totals,
/// [`Error::VersionConflict`] when `expected_version` is stale.
pub async fn send_quote(
    db: &DatabaseConnection,
    quote_id: i64,
    expected_version: i32,
) -> Result<quote::Model> {
    let txn = db.begin().await?;

    let quote = quote::Entity::find_by_id(quote_id)
        .one(&txn)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })?;
    if quote.status != quote::STATUS_DRAFT {
        return Err(Error::QuoteAlreadySent { id: quote_id });
    }
    if quote.version != expected_version {
        return Err(Error::VersionConflict {
            entity: "quote",
            id: quote_id,
            expected: expected_version,
            actual: quote.version,
        });
    }

    // Audit-flagged invariant, checked before anything is frozen
    let items = get_quote_items(&txn, quote_id).await?;
    let computed: f64 = items.iter().map(|i| i.total_price).sum();
    if (computed - quote.total_price).abs() > TOTAL_TOLERANCE {
        return Err(Error::QuoteTotalMismatch {
            stored: quote.total_price,
            computed,
        });
    }

    for item in items {
        let batch = batch::Entity::find_by_id(item.batch_id)
            .one(&txn)
            .await?
            .ok_or(Error::BatchNotFound { id: item.batch_id })?;
        let frozen = batch_ops::freeze_batch(&txn, batch.id, batch.version).await?;

        let snapshot = BatchSnapshot::capture(&txn, &frozen).await?;
        let mut active: quote_item::ActiveModel = item.into();
        active.snapshot = Set(Some(snapshot.to_json()?));
        active.update(&txn).await?;
    }

    let result = quote::Entity::update_many()
        .set(quote::ActiveModel {
            status: Set(quote::STATUS_SENT.to_string()),
            sent_at: Set(Some(Utc::now())),
            version: Set(expected_version + 1),
            ..Default::default()
        })
        .filter(quote::Column::Id.eq(quote_id))
        .filter(quote::Column::Version.eq(expected_version))
        .filter(quote::Column::Status.eq(quote::STATUS_DRAFT))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::VersionConflict {
            entity: "quote",
            id: quote_id,
            expected: expected_version,
            actual: quote.version,
        });
    }

    txn.commit().await?;
    info!(quote_id, "quote sent, batches frozen");

    quote::Entity::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })
}
