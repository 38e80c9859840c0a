//! Ingestion entry point - records raw transactions from the bank feed.
//!
//! The feed itself (polling, token refresh) is an external collaborator;
//! this module only provides the write path it calls. Incoming rows are
//! deduplicated on the bank's stable external id and pre-categorised through
//! the automatic rules, but no pot balance moves until a user allocates the
//! transaction.

use crate::{
    core::rules,
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// Records one incoming bank transaction.
///
/// Deduplicates on `external_id`: a transaction that was already ingested is
/// returned unchanged, whatever allocation state it has reached since. New
/// rows start unprocessed, with `pot_id` pre-populated from a matching
/// merchant rule when one exists.
#[instrument(skip(db))]
pub async fn record_incoming_transaction(
    db: &DatabaseConnection,
    external_id: String,
    merchant_name: String,
    amount: i64,
    booking_date: NaiveDate,
) -> Result<transaction::Model> {
    if amount <= 0 {
        return Err(Error::InvalidAllocation {
            message: format!("Transaction amount must be positive: {amount}"),
        });
    }

    if let Some(existing) = Transaction::find()
        .filter(transaction::Column::ExternalId.eq(external_id.clone()))
        .one(db)
        .await?
    {
        debug!(external_id, "transaction already ingested, skipping");
        return Ok(existing);
    }

    let matched_pot = rules::match_merchant(db, &merchant_name).await?;

    let row = transaction::ActiveModel {
        external_id: Set(external_id),
        merchant_name: Set(merchant_name),
        amount: Set(amount),
        booking_date: Set(booking_date),
        processed: Set(false),
        pot_id: Set(matched_pot),
        ..Default::default()
    };

    let result = row.insert(db).await?;
    Ok(result)
}
