//! Transaction allocation - assigns one transaction to one pot.
//!
//! `set_transaction_pot` moves a whole transaction between pots (or out of
//! any pot) inside a single database transaction: the previous allocation is
//! fully reversed before the new one is applied, so a reassignment from pot
//! A to pot B leaves A exactly as it was before the first allocation.
//! Overdrawing a pot is a legitimate, visible state and never rejected here.

use crate::{
    core::{pot, retry},
    entities::{SpendingPot, Transaction, TransactionSplit, transaction, transaction_split},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::instrument;

/// Reverses whatever allocation is currently applied to `tx`, returning the
/// split rows that were found (still present in the store; callers decide
/// whether to reconcile or delete them).
///
/// Split rows always represent applied balances. A bare `pot_id` only does
/// when the transaction is processed - ingestion pre-assigns `pot_id` from a
/// merchant rule without moving any balance, and un-applying that would
/// corrupt the pot. A pot deleted since the allocation is skipped silently.
pub(crate) async fn reverse_applied_balances<C>(
    txn: &C,
    tx: &transaction::Model,
) -> Result<Vec<transaction_split::Model>>
where
    C: ConnectionTrait,
{
    let splits = TransactionSplit::find()
        .filter(transaction_split::Column::TransactionId.eq(tx.id))
        .all(txn)
        .await?;

    if splits.is_empty() {
        if let (true, Some(pot_id)) = (tx.processed, tx.pot_id) {
            if SpendingPot::find_by_id(pot_id).one(txn).await?.is_some() {
                pot::apply_spend_delta(txn, pot_id, -tx.amount).await?;
            }
        }
        return Ok(splits);
    }

    for split in &splits {
        if let Some(pot_id) = split.pot_id {
            if SpendingPot::find_by_id(pot_id).one(txn).await?.is_some() {
                pot::apply_spend_delta(txn, pot_id, -split.amount).await?;
            }
        }
    }

    Ok(splits)
}

/// Assigns a transaction to a pot, or removes its allocation.
///
/// Fails with `TransactionNotFound` / `PotNotFound` when either side is
/// missing. Any previous allocation - single-pot or split - is reversed
/// first, then the forward allocation is applied and the transaction is
/// marked processed, all inside one atomic database transaction with
/// bounded retry on write conflicts.
#[instrument(skip(db))]
pub async fn set_transaction_pot(
    db: &DatabaseConnection,
    transaction_id: i64,
    pot_id: Option<i64>,
) -> Result<transaction::Model> {
    retry::with_conflict_retry("set_transaction_pot", || {
        set_transaction_pot_once(db, transaction_id, pot_id)
    })
    .await
}

async fn set_transaction_pot_once(
    db: &DatabaseConnection,
    transaction_id: i64,
    pot_id: Option<i64>,
) -> Result<transaction::Model> {
    let txn = db.begin().await?;

    let tx = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let old_splits = reverse_applied_balances(&txn, &tx).await?;
    if !old_splits.is_empty() {
        // Single-pot allocation supersedes any split rows
        TransactionSplit::delete_many()
            .filter(transaction_split::Column::TransactionId.eq(tx.id))
            .exec(&txn)
            .await?;
    }

    if let Some(new_pot_id) = pot_id {
        // apply_spend_delta fails with PotNotFound when the target is missing
        pot::apply_spend_delta(&txn, new_pot_id, tx.amount).await?;
    }

    let mut active: transaction::ActiveModel = tx.into();
    active.pot_id = Set(pot_id);
    active.processed = Set(true);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::pot::get_spending_pot_by_id;
    use crate::test_utils::{
        create_test_spending_pot, create_test_transaction, setup_test_db,
    };

    #[tokio::test]
    async fn test_set_pot_transaction_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_transaction_pot(&db, 999, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_pot_target_pot_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let tx = create_test_transaction(&db, "tx-1", "Tesco", 1200).await?;

        let result = set_transaction_pot(&db, tx.id, Some(999)).await;
        assert!(matches!(result.unwrap_err(), Error::PotNotFound { id: 999 }));

        // Nothing was applied: the transaction is still unprocessed
        let unchanged = crate::core::transaction::get_transaction_by_id(&db, tx.id)
            .await?
            .unwrap();
        assert!(!unchanged.processed);

        Ok(())
    }

    #[tokio::test]
    async fn test_allocation_applies_spend() -> Result<()> {
        let db = setup_test_db().await?;
        let groceries = create_test_spending_pot(&db, "Groceries", 10000).await?;
        let tx = create_test_transaction(&db, "tx-1", "Tesco", 1200).await?;

        let updated = set_transaction_pot(&db, tx.id, Some(groceries.id)).await?;
        assert!(updated.processed);
        assert_eq!(updated.pot_id, Some(groceries.id));

        let pot = get_spending_pot_by_id(&db, groceries.id).await?.unwrap();
        assert_eq!(pot.amount_spent, 1200);
        assert_eq!(pot.amount_left, 8800);
        assert_eq!(pot.amount_spent + pot.amount_left, pot.amount_allocated);

        Ok(())
    }

    #[tokio::test]
    async fn test_reallocation_restores_old_pot_exactly() -> Result<()> {
        let db = setup_test_db().await?;
        let pot_a = create_test_spending_pot(&db, "A", 10000).await?;
        let pot_b = create_test_spending_pot(&db, "B", 5000).await?;
        let tx = create_test_transaction(&db, "tx-1", "Tesco", 1200).await?;

        set_transaction_pot(&db, tx.id, Some(pot_a.id)).await?;
        set_transaction_pot(&db, tx.id, Some(pot_b.id)).await?;

        let a = get_spending_pot_by_id(&db, pot_a.id).await?.unwrap();
        assert_eq!(a.amount_spent, 0);
        assert_eq!(a.amount_left, 10000);

        let b = get_spending_pot_by_id(&db, pot_b.id).await?.unwrap();
        assert_eq!(b.amount_spent, 1200);
        assert_eq!(b.amount_left, 3800);

        Ok(())
    }

    #[tokio::test]
    async fn test_unallocate_twice_is_noop_second_time() -> Result<()> {
        let db = setup_test_db().await?;
        let groceries = create_test_spending_pot(&db, "Groceries", 10000).await?;
        let tx = create_test_transaction(&db, "tx-1", "Tesco", 1200).await?;

        set_transaction_pot(&db, tx.id, Some(groceries.id)).await?;
        set_transaction_pot(&db, tx.id, None).await?;

        let pot = get_spending_pot_by_id(&db, groceries.id).await?.unwrap();
        assert_eq!(pot.amount_spent, 0);
        assert_eq!(pot.amount_left, 10000);

        // Second null allocation must not move anything
        let again = set_transaction_pot(&db, tx.id, None).await?;
        assert!(again.processed);
        assert_eq!(again.pot_id, None);

        let pot = get_spending_pot_by_id(&db, groceries.id).await?.unwrap();
        assert_eq!(pot.amount_spent, 0);
        assert_eq!(pot.amount_left, 10000);

        Ok(())
    }

    #[tokio::test]
    async fn test_pre_assigned_pot_is_not_reversed() -> Result<()> {
        let db = setup_test_db().await?;
        let groceries = create_test_spending_pot(&db, "Groceries", 10000).await?;
        crate::core::rules::add_rule(&db, "Tesco".to_string(), groceries.id, false).await?;

        // Ingestion pre-assigns the pot without moving any balance
        let tx = crate::core::ingest::record_incoming_transaction(
            &db,
            "tx-1".to_string(),
            "Tesco".to_string(),
            1200,
            crate::test_utils::test_date(2024, 3, 5),
        )
        .await?;
        assert_eq!(tx.pot_id, Some(groceries.id));

        // Confirming the pre-assignment must apply exactly one forward delta
        set_transaction_pot(&db, tx.id, Some(groceries.id)).await?;

        let pot = get_spending_pot_by_id(&db, groceries.id).await?.unwrap();
        assert_eq!(pot.amount_spent, 1200);
        assert_eq!(pot.amount_left, 8800);

        Ok(())
    }

    #[tokio::test]
    async fn test_overdraw_is_not_an_error() -> Result<()> {
        let db = setup_test_db().await?;
        let small = create_test_spending_pot(&db, "Small", 500).await?;
        let tx = create_test_transaction(&db, "tx-1", "Tesco", 1200).await?;

        set_transaction_pot(&db, tx.id, Some(small.id)).await?;

        let pot = get_spending_pot_by_id(&db, small.id).await?.unwrap();
        assert_eq!(pot.amount_left, -700);
        assert_eq!(pot.amount_spent + pot.amount_left, pot.amount_allocated);

        Ok(())
    }
}
