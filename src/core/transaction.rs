//! Transaction query helpers.
//!
//! Read-only lookups used by the allocation services and the API layer.
//! Mutation lives in [`crate::core::allocation`] and [`crate::core::split`].

use crate::{
    entities::{Transaction, TransactionSplit, transaction, transaction_split},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};

/// Retrieves a transaction by its internal id.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions awaiting a user allocation, oldest first.
pub async fn get_unprocessed_transactions(
    db: &DatabaseConnection,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::Processed.eq(false))
        .order_by_asc(transaction::Column::BookingDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions booked in a calendar month, newest first.
pub async fn get_transactions_for_month(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<transaction::Model>> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::Config {
        message: format!("Invalid month: {year}-{month}"),
    })?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::Config {
        message: format!("Invalid month: {year}-{month}"),
    })?;

    Transaction::find()
        .filter(transaction::Column::BookingDate.gte(start))
        .filter(transaction::Column::BookingDate.lt(end))
        .order_by_desc(transaction::Column::BookingDate)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the split rows of a transaction, if any.
pub async fn get_splits_for_transaction<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Vec<transaction_split::Model>>
where
    C: ConnectionTrait,
{
    TransactionSplit::find()
        .filter(transaction_split::Column::TransactionId.eq(transaction_id))
        .order_by_asc(transaction_split::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
