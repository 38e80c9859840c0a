//! Split allocation - divides one transaction's amount across pots.
//!
//! A split set replaces whatever allocation the transaction had before,
//! single-pot or split. Slices may target a real pot or be explicitly
//! excluded from pot tracking (a reimbursed portion, for example); excluded
//! amounts persist as rows but never touch a pot. Partial allocation is
//! allowed - the slice amounts only have to stay within the transaction
//! total.

use crate::{
    core::{allocation, pot, retry},
    entities::{Transaction, TransactionSplit, transaction, transaction_split},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::instrument;

/// Where one slice of a split transaction goes.
///
/// The wire format's `-1` sentinel is converted to [`Self::Excluded`] at the
/// API boundary so no magic pot id circulates inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitTarget {
    /// The slice is allocated to a spending pot.
    Pot(i64),
    /// The slice is explicitly excluded from pot tracking.
    Excluded,
}

/// One requested slice of a split.
///
/// `id` is negative (synthetic) for a slice that does not exist yet and
/// positive to edit the persisted row with that id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitInput {
    /// Synthetic (negative) or persisted (positive) row id
    pub id: i64,
    /// Pot target or explicit exclusion
    pub target: SplitTarget,
    /// Slice amount in minor units
    pub amount: i64,
}

/// Validates a split set against the transaction total.
///
/// Zero-amount slices have already been dropped by the caller. Rejections
/// are `InvalidAllocation`: negative amounts, two slices on the same pot,
/// more than one excluded slice, or a sum above the transaction amount.
fn validate_splits(splits: &[SplitInput], transaction_amount: i64) -> Result<()> {
    let mut seen_pots = HashSet::new();
    let mut seen_excluded = false;
    let mut total: i64 = 0;

    for split in splits {
        if split.amount < 0 {
            return Err(Error::InvalidAllocation {
                message: format!("Split amount must be positive: {}", split.amount),
            });
        }
        match split.target {
            SplitTarget::Pot(pot_id) => {
                if !seen_pots.insert(pot_id) {
                    return Err(Error::InvalidAllocation {
                        message: format!("Pot {pot_id} appears more than once in the split set"),
                    });
                }
            }
            SplitTarget::Excluded => {
                if seen_excluded {
                    return Err(Error::InvalidAllocation {
                        message: "More than one excluded split in the set".to_string(),
                    });
                }
                seen_excluded = true;
            }
        }
        total += split.amount;
    }

    if total > transaction_amount {
        return Err(Error::InvalidAllocation {
            message: format!(
                "Split total {total} exceeds transaction amount {transaction_amount}"
            ),
        });
    }

    Ok(())
}

/// Replaces a transaction's allocation with a split set.
///
/// Zero-amount slices are dropped, the rest are validated, the previous
/// allocation is fully reversed, each pot slice is applied forward, and the
/// persisted split rows are reconciled with the request: positive ids update
/// the existing row (`SplitNotFound` if it is missing or belongs to another
/// transaction), negative ids insert, and rows absent from the request are
/// deleted. The transaction ends processed with `pot_id` cleared. An empty
/// set fully unallocates. Everything runs in one atomic database
/// transaction with bounded retry on write conflicts.
#[instrument(skip(db, splits))]
pub async fn split_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    splits: Vec<SplitInput>,
) -> Result<transaction::Model> {
    // Zero-amount slices are dropped before any validation
    let splits: Vec<SplitInput> = splits.into_iter().filter(|s| s.amount != 0).collect();

    retry::with_conflict_retry("split_transaction", || {
        split_transaction_once(db, transaction_id, &splits)
    })
    .await
}

async fn split_transaction_once(
    db: &DatabaseConnection,
    transaction_id: i64,
    splits: &[SplitInput],
) -> Result<transaction::Model> {
    let txn = db.begin().await?;

    let tx = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    validate_splits(splits, tx.amount)?;

    // Undo the previous state completely before applying the new set, so a
    // re-split never double-counts
    let existing = allocation::reverse_applied_balances(&txn, &tx).await?;
    let existing_ids: HashSet<i64> = existing.iter().map(|s| s.id).collect();

    let mut kept_ids = HashSet::new();
    for split in splits {
        let pot_id = match split.target {
            SplitTarget::Pot(pot_id) => {
                // apply_spend_delta fails with PotNotFound when missing
                pot::apply_spend_delta(&txn, pot_id, split.amount).await?;
                Some(pot_id)
            }
            SplitTarget::Excluded => None,
        };

        if split.id > 0 {
            if !existing_ids.contains(&split.id) {
                return Err(Error::SplitNotFound { id: split.id });
            }
            let row = transaction_split::ActiveModel {
                id: Set(split.id),
                transaction_id: Set(tx.id),
                pot_id: Set(pot_id),
                amount: Set(split.amount),
            };
            row.update(&txn).await?;
            kept_ids.insert(split.id);
        } else {
            let row = transaction_split::ActiveModel {
                transaction_id: Set(tx.id),
                pot_id: Set(pot_id),
                amount: Set(split.amount),
                ..Default::default()
            };
            row.insert(&txn).await?;
        }
    }

    // Rows the request no longer mentions are deleted
    let stale: Vec<i64> = existing_ids.difference(&kept_ids).copied().collect();
    if !stale.is_empty() {
        TransactionSplit::delete_many()
            .filter(transaction_split::Column::Id.is_in(stale))
            .exec(&txn)
            .await?;
    }

    // The single-pot field is mutually exclusive with split rows
    let mut active: transaction::ActiveModel = tx.into();
    active.pot_id = Set(None);
    active.processed = Set(true);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}
