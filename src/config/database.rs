//! Database configuration module for the pot ledger.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Schema comes straight from the entity definitions via
//! `Schema::create_table_from_entity`, so the database always matches the
//! Rust struct definitions without hand-written SQL.

use crate::entities::{
    AutomaticRule, HistoricMonth, HistoricPot, SavingsPot, SpendingPot, Transaction,
    TransactionSplit,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on an already-initialized database; every statement carries
/// `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut spending_pot_table = schema.create_table_from_entity(SpendingPot);
    let mut savings_pot_table = schema.create_table_from_entity(SavingsPot);
    let mut historic_month_table = schema.create_table_from_entity(HistoricMonth);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut split_table = schema.create_table_from_entity(TransactionSplit);
    let mut rule_table = schema.create_table_from_entity(AutomaticRule);
    let mut historic_pot_table = schema.create_table_from_entity(HistoricPot);

    // Referenced tables first: transactions carry a foreign key into
    // historic_months
    db.execute(builder.build(spending_pot_table.if_not_exists()))
        .await?;
    db.execute(builder.build(savings_pot_table.if_not_exists()))
        .await?;
    db.execute(builder.build(historic_month_table.if_not_exists()))
        .await?;
    db.execute(builder.build(transaction_table.if_not_exists()))
        .await?;
    db.execute(builder.build(split_table.if_not_exists())).await?;
    db.execute(builder.build(rule_table.if_not_exists())).await?;
    db.execute(builder.build(historic_pot_table.if_not_exists()))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        SpendingPotModel, TransactionModel, TransactionSplitModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<SpendingPotModel> = SpendingPot::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<TransactionSplitModel> = TransactionSplit::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_connection_works_after_setup() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<SpendingPotModel> = SpendingPot::find().limit(1).all(&db).await?;
        Ok(())
    }
}
