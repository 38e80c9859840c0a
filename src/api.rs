//! Transport-agnostic API surface: request/response types and the facade
//! functions the HTTP layer (out of scope here) calls into.
//!
//! The split request uses the wire convention where `pot_id = -1` means
//! "explicitly unallocated"; conversion into the typed [`SplitTarget`]
//! happens here so the sentinel never reaches the engine.

use crate::core::rollover::{PotAllocation, RolloverSummary};
use crate::core::split::{SplitInput, SplitTarget};
use crate::entities::transaction;
use crate::errors::{Error, Result};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

pub use crate::core::stats::{HistoricMonthReport, HomepageStats, YearlyHistoricData};

/// Wire-level pot id meaning "excluded from pot tracking".
pub const UNALLOCATED_POT_ID: i64 = -1;

/// Request to assign a transaction to a pot (or clear its allocation).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Transaction to update
    pub transaction_id: i64,
    /// Target pot, or `None` to unallocate
    pub pot_id: Option<i64>,
}

/// One slice of a split request, in wire form.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitRequestItem {
    /// Negative for a new slice, positive to edit a persisted row
    pub id: i64,
    /// Real pot id, or [`UNALLOCATED_POT_ID`] for an excluded slice
    pub pot_id: i64,
    /// Slice amount in minor units
    pub amount: i64,
}

/// Request to split a transaction across pots.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitTransactionRequest {
    /// Transaction to split
    pub transaction_id: i64,
    /// The full replacement split set
    pub splits: Vec<SplitRequestItem>,
}

/// One pot's allocation within a rollover request.
#[derive(Debug, Clone, Deserialize)]
pub struct PotAllocationRequest {
    /// Pot receiving the allocation
    pub pot_id: i64,
    /// Amount to add this cycle, in minor units
    pub amount_to_add: i64,
}

/// Request to close the current cycle and open the next.
#[derive(Debug, Clone, Deserialize)]
pub struct AddNewMonthRequest {
    /// Income recorded for the new cycle
    pub monthly_income: i64,
    /// Spending pots whose unspent balance carries forward
    pub pot_ids_to_rollover: Vec<i64>,
    /// New-cycle allocations for spending pots
    pub spending_pots: Vec<PotAllocationRequest>,
    /// Contributions to savings pots
    pub savings_pots: Vec<PotAllocationRequest>,
}

/// A transaction as listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    /// Internal transaction id
    pub id: i64,
    /// Merchant name as reported by the bank
    pub merchant_name: String,
    /// Amount in minor units
    pub amount: i64,
    /// Booking date
    pub date: chrono::NaiveDate,
    /// Allocated pot, when single-pot allocated
    pub pot_id: Option<i64>,
}

impl TryFrom<SplitRequestItem> for SplitInput {
    type Error = Error;

    fn try_from(item: SplitRequestItem) -> std::result::Result<Self, Error> {
        let target = match item.pot_id {
            UNALLOCATED_POT_ID => SplitTarget::Excluded,
            id if id > 0 => SplitTarget::Pot(id),
            other => {
                return Err(Error::InvalidAllocation {
                    message: format!("Invalid pot id in split: {other}"),
                });
            }
        };
        Ok(Self {
            id: item.id,
            target,
            amount: item.amount,
        })
    }
}

impl From<PotAllocationRequest> for PotAllocation {
    fn from(req: PotAllocationRequest) -> Self {
        Self {
            pot_id: req.pot_id,
            amount_to_add: req.amount_to_add,
        }
    }
}

impl From<transaction::Model> for TransactionView {
    fn from(tx: transaction::Model) -> Self {
        Self {
            id: tx.id,
            merchant_name: tx.merchant_name,
            amount: tx.amount,
            date: tx.booking_date,
            pot_id: tx.pot_id,
        }
    }
}

/// Assigns or clears a transaction's pot.
pub async fn update_transaction(
    db: &DatabaseConnection,
    request: UpdateTransactionRequest,
) -> Result<TransactionView> {
    let updated =
        crate::core::allocation::set_transaction_pot(db, request.transaction_id, request.pot_id)
            .await?;
    Ok(updated.into())
}

/// Replaces a transaction's allocation with the requested split set.
pub async fn split_transaction(
    db: &DatabaseConnection,
    request: SplitTransactionRequest,
) -> Result<TransactionView> {
    let splits = request
        .splits
        .into_iter()
        .map(SplitInput::try_from)
        .collect::<Result<Vec<_>>>()?;
    let updated =
        crate::core::split::split_transaction(db, request.transaction_id, splits).await?;
    Ok(updated.into())
}

/// Closes the current cycle and opens the next.
pub async fn add_new_month(
    db: &DatabaseConnection,
    request: AddNewMonthRequest,
) -> Result<RolloverSummary> {
    let spending: Vec<PotAllocation> =
        request.spending_pots.into_iter().map(Into::into).collect();
    let savings: Vec<PotAllocation> = request.savings_pots.into_iter().map(Into::into).collect();
    crate::core::rollover::add_new_month(
        db,
        request.monthly_income,
        &request.pot_ids_to_rollover,
        &spending,
        &savings,
    )
    .await
}

/// Lists transactions awaiting a user allocation.
pub async fn get_unprocessed_transactions(
    db: &DatabaseConnection,
) -> Result<Vec<TransactionView>> {
    let rows = crate::core::transaction::get_unprocessed_transactions(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists transactions booked in a calendar month.
pub async fn get_transactions_for_month(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<TransactionView>> {
    let rows = crate::core::transaction::get_transactions_for_month(db, year, month).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Computes the home dashboard figures.
pub async fn get_homepage_stats(db: &DatabaseConnection) -> Result<HomepageStats> {
    crate::core::stats::get_homepage_stats(db).await
}

/// Projects one frozen month snapshot into reporting shape.
pub async fn get_historic_month_data(
    db: &DatabaseConnection,
    month_id: i64,
) -> Result<HistoricMonthReport> {
    crate::core::stats::get_historic_month_data(db, month_id).await
}

/// Returns the last twelve snapshots and their totals.
pub async fn get_yearly_historic_data(db: &DatabaseConnection) -> Result<YearlyHistoricData> {
    crate::core::stats::get_yearly_historic_data(db).await
}
