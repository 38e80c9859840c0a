//! Shared test utilities for the pot ledger.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{ingest, pot},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a date without the `Option` dance; panics only on a bad literal.
#[allow(clippy::unwrap_used)]
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a spending pot with the given name and initial allocation.
pub async fn create_test_spending_pot(
    db: &DatabaseConnection,
    name: &str,
    allocation: i64,
) -> Result<entities::spending_pot::Model> {
    pot::create_spending_pot(db, name.to_string(), allocation).await
}

/// Ingests a transaction with sensible defaults.
///
/// # Defaults
/// * `booking_date`: 2024-03-05
/// * no matching rule side effects unless the test added rules first
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    external_id: &str,
    merchant_name: &str,
    amount: i64,
) -> Result<entities::transaction::Model> {
    ingest::record_incoming_transaction(
        db,
        external_id.to_string(),
        merchant_name.to_string(),
        amount,
        test_date(2024, 3, 5),
    )
    .await
}
