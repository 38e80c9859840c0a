//! Month rollover - closes out the current budgeting cycle.
//!
//! One call snapshots every spending pot into immutable history, resets the
//! spending pots named in the allocation list (optionally carrying forward
//! their unspent balance), and accumulates the savings pots. The operation
//! is deliberately not idempotent: calling it twice produces two snapshots
//! and double-applies allocations, so the caller invokes it at most once per
//! cycle and concurrent calls are serialized process-wide.

use crate::{
    core::retry,
    entities::{
        SavingsPot, SpendingPot, Transaction, historic_month, historic_pot, savings_pot,
        spending_pot, transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::{info, instrument};

// add_new_month touches every pot and is not idempotent, so only one call
// may run at a time in this process
static ROLLOVER_LOCK: Mutex<()> = Mutex::const_new(());

/// One pot's share of the new cycle's income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotAllocation {
    /// Pot receiving the allocation
    pub pot_id: i64,
    /// Amount to add this cycle, in minor units
    pub amount_to_add: i64,
}

/// Before/after figures for one spending pot reset by a rollover.
#[derive(Debug, Clone)]
pub struct SpendingPotRollover {
    /// Name of the pot
    pub pot_name: String,
    /// Unspent balance before the reset
    pub previous_left: i64,
    /// Portion of `previous_left` carried into the new allocation
    pub rolled_over: i64,
    /// The pot's allocation for the new cycle
    pub new_allocated: i64,
}

/// Result of a completed month rollover.
#[derive(Debug, Clone)]
pub struct RolloverSummary {
    /// Id of the historic snapshot that was written
    pub month_id: i64,
    /// Moment the snapshot was taken
    pub date_added: DateTime<Utc>,
    /// Number of spending pots captured in the snapshot
    pub pots_snapshotted: usize,
    /// Total spent across all spending pots at snapshot time
    pub total_spent: i64,
    /// Total added to savings pots by this call
    pub total_saved: i64,
    /// Detailed results for each spending pot that was reset
    pub spending_resets: Vec<SpendingPotRollover>,
}

/// Closes the current cycle and opens the next one.
///
/// Every spending pot is snapshotted as it stands; then each pot named in
/// `spending_allocations` is reset to `amount_to_add` plus, when its id is
/// in `rollover_pot_ids`, its previous unspent balance. Savings allocations
/// accumulate unconditionally. Any unknown pot id fails the whole call with
/// `PotNotFound` - there is no partial rollover.
#[instrument(skip(db, rollover_pot_ids, spending_allocations, savings_allocations))]
pub async fn add_new_month(
    db: &DatabaseConnection,
    monthly_income: i64,
    rollover_pot_ids: &[i64],
    spending_allocations: &[PotAllocation],
    savings_allocations: &[PotAllocation],
) -> Result<RolloverSummary> {
    let _guard = ROLLOVER_LOCK.lock().await;

    retry::with_conflict_retry("add_new_month", || {
        add_new_month_once(
            db,
            monthly_income,
            rollover_pot_ids,
            spending_allocations,
            savings_allocations,
        )
    })
    .await
}

#[allow(clippy::too_many_lines)]
async fn add_new_month_once(
    db: &DatabaseConnection,
    monthly_income: i64,
    rollover_pot_ids: &[i64],
    spending_allocations: &[PotAllocation],
    savings_allocations: &[PotAllocation],
) -> Result<RolloverSummary> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let spending_pots = SpendingPot::find().all(&txn).await?;
    let pots_by_id: HashMap<i64, &spending_pot::Model> =
        spending_pots.iter().map(|p| (p.id, p)).collect();

    // Validate every referenced id up front so the call aborts whole; a pot
    // listed twice in one allocation list would silently last-win
    for id in rollover_pot_ids {
        if !pots_by_id.contains_key(id) {
            return Err(Error::PotNotFound { id: *id });
        }
    }
    let mut seen_spending = HashSet::new();
    for alloc in spending_allocations {
        if !pots_by_id.contains_key(&alloc.pot_id) {
            return Err(Error::PotNotFound { id: alloc.pot_id });
        }
        if !seen_spending.insert(alloc.pot_id) {
            return Err(Error::InvalidAllocation {
                message: format!(
                    "Pot {} appears more than once in the spending allocations",
                    alloc.pot_id
                ),
            });
        }
    }
    let mut savings_by_id: HashMap<i64, savings_pot::Model> = HashMap::new();
    for alloc in savings_allocations {
        let pot = SavingsPot::find_by_id(alloc.pot_id)
            .one(&txn)
            .await?
            .ok_or(Error::PotNotFound { id: alloc.pot_id })?;
        if savings_by_id.insert(alloc.pot_id, pot).is_some() {
            return Err(Error::InvalidAllocation {
                message: format!(
                    "Pot {} appears more than once in the savings allocations",
                    alloc.pot_id
                ),
            });
        }
    }

    let total_spent: i64 = spending_pots.iter().map(|p| p.amount_spent).sum();
    let total_saved: i64 = savings_allocations.iter().map(|a| a.amount_to_add).sum();

    // Snapshot header plus a frozen copy of every spending pot, pre-reset
    let month = historic_month::ActiveModel {
        date_added: Set(now),
        monthly_income: Set(monthly_income),
        amount_saved: Set(total_saved),
        amount_spent: Set(total_spent),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for pot in &spending_pots {
        historic_pot::ActiveModel {
            month_id: Set(month.id),
            pot_id: Set(pot.id),
            pot_amount: Set(pot.amount_allocated),
            pot_amount_spent: Set(pot.amount_spent),
            pot_amount_left: Set(pot.amount_left),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    // Attribute this cycle's allocated transactions to the snapshot;
    // anything still unprocessed rolls into the next one
    {
        use sea_orm::sea_query::Expr;
        Transaction::update_many()
            .col_expr(transaction::Column::MonthId, Expr::value(month.id))
            .filter(transaction::Column::Processed.eq(true))
            .filter(transaction::Column::MonthId.is_null())
            .exec(&txn)
            .await?;
    }

    // Reset the allocated spending pots for the new cycle
    let rollover_set: HashSet<i64> = rollover_pot_ids.iter().copied().collect();
    let mut spending_resets = Vec::with_capacity(spending_allocations.len());
    for alloc in spending_allocations {
        let pot = pots_by_id[&alloc.pot_id];
        let rolled_over = if rollover_set.contains(&alloc.pot_id) {
            pot.amount_left
        } else {
            0
        };
        let new_allocated = alloc.amount_to_add + rolled_over;

        let mut active: spending_pot::ActiveModel = pot.clone().into();
        active.amount_allocated = Set(new_allocated);
        active.amount_added_this_cycle = Set(alloc.amount_to_add);
        active.amount_spent = Set(0);
        active.amount_left = Set(new_allocated);
        active.update(&txn).await?;

        spending_resets.push(SpendingPotRollover {
            pot_name: pot.name.clone(),
            previous_left: pot.amount_left,
            rolled_over,
            new_allocated,
        });
    }

    // Savings never reset; rollover choice does not apply
    for alloc in savings_allocations {
        let pot = savings_by_id
            .remove(&alloc.pot_id)
            .ok_or(Error::PotNotFound { id: alloc.pot_id })?;
        let new_saved = pot.amount_saved + alloc.amount_to_add;
        let mut active: savings_pot::ActiveModel = pot.into();
        active.amount_saved = Set(new_saved);
        active.amount_added_this_cycle = Set(alloc.amount_to_add);
        active.update(&txn).await?;
    }

    txn.commit().await?;

    info!(
        month_id = month.id,
        pots = spending_pots.len(),
        total_spent,
        total_saved,
        "month rollover complete"
    );

    Ok(RolloverSummary {
        month_id: month.id,
        date_added: now,
        pots_snapshotted: spending_pots.len(),
        total_spent,
        total_saved,
        spending_resets,
    })
}
