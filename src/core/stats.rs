//! Stats aggregator - read-only projections over current and historic state.
//!
//! Nothing in this module mutates the store; every figure is derived from
//! the live pots, the transaction history, and the frozen month snapshots.

use crate::{
    entities::{
        HistoricMonth, HistoricPot, Transaction, historic_month, historic_pot, transaction,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// How many merchants a month report lists, by total spend.
const TOP_MERCHANT_LIMIT: usize = 10;

/// Headline figures for the home dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HomepageStats {
    /// Most recently recorded monthly income, 0 before the first rollover
    pub money_in: i64,
    /// Sum of `amount_spent` across all spending pots
    pub money_spent: i64,
    /// Sum of `amount_left` across all spending pots
    pub money_left: i64,
    /// Sum of `amount_saved` across all savings pots
    pub total_in_savings: i64,
    /// Sum of `amount_allocated` across all spending pots
    pub total_in_spending_pots: i64,
}

/// Total spend at one merchant within a month window.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantSpend {
    /// Merchant name as reported by the bank
    pub merchant_name: String,
    /// Total spent there, in minor units
    pub total: i64,
}

/// Total spend booked on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DailySpend {
    /// Booking date
    pub date: NaiveDate,
    /// Total spent that day, in minor units
    pub total: i64,
}

/// A frozen month snapshot projected into reporting shape.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricMonthReport {
    /// The snapshot header
    pub month: historic_month::Model,
    /// Frozen per-pot figures
    pub pots: Vec<historic_pot::Model>,
    /// Merchants with the highest spend in the snapshot window
    pub top_merchants: Vec<MerchantSpend>,
    /// Spend per booking day in the snapshot window
    pub daily_spend: Vec<DailySpend>,
}

/// Snapshots plus totals for the yearly report.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyHistoricData {
    /// Up to the last twelve snapshots, newest first
    pub months: Vec<historic_month::Model>,
    /// Income summed across those snapshots
    pub total_income: i64,
    /// Spend summed across those snapshots
    pub total_spent: i64,
    /// Savings contributions summed across those snapshots
    pub total_saved: i64,
}

/// Computes the home dashboard figures from current pot state.
pub async fn get_homepage_stats(db: &DatabaseConnection) -> Result<HomepageStats> {
    let spending = crate::core::pot::get_all_spending_pots(db).await?;
    let savings = crate::core::pot::get_all_savings_pots(db).await?;

    let latest_month = HistoricMonth::find()
        .order_by_desc(historic_month::Column::DateAdded)
        .order_by_desc(historic_month::Column::Id)
        .one(db)
        .await?;

    Ok(HomepageStats {
        money_in: latest_month.map_or(0, |m| m.monthly_income),
        money_spent: spending.iter().map(|p| p.amount_spent).sum(),
        money_left: spending.iter().map(|p| p.amount_left).sum(),
        total_in_savings: savings.iter().map(|p| p.amount_saved).sum(),
        total_in_spending_pots: spending.iter().map(|p| p.amount_allocated).sum(),
    })
}

/// Projects one frozen month snapshot into reporting shape.
///
/// Merchant and per-day figures come from the transactions attributed to
/// this snapshot when the rollover closed the cycle; transactions allocated
/// afterwards belong to the next snapshot.
pub async fn get_historic_month_data(
    db: &DatabaseConnection,
    month_id: i64,
) -> Result<HistoricMonthReport> {
    let month = HistoricMonth::find_by_id(month_id)
        .one(db)
        .await?
        .ok_or(Error::MonthNotFound { id: month_id })?;

    let pots = HistoricPot::find()
        .filter(historic_pot::Column::MonthId.eq(month_id))
        .order_by_asc(historic_pot::Column::PotId)
        .all(db)
        .await?;

    let transactions = Transaction::find()
        .filter(transaction::Column::MonthId.eq(month_id))
        .all(db)
        .await?;

    let mut by_merchant: HashMap<String, i64> = HashMap::new();
    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for tx in &transactions {
        *by_merchant.entry(tx.merchant_name.clone()).or_default() += tx.amount;
        *by_day.entry(tx.booking_date).or_default() += tx.amount;
    }

    let mut top_merchants: Vec<MerchantSpend> = by_merchant
        .into_iter()
        .map(|(merchant_name, total)| MerchantSpend {
            merchant_name,
            total,
        })
        .collect();
    top_merchants.sort_by(|a, b| b.total.cmp(&a.total).then(a.merchant_name.cmp(&b.merchant_name)));
    top_merchants.truncate(TOP_MERCHANT_LIMIT);

    let mut daily_spend: Vec<DailySpend> = by_day
        .into_iter()
        .map(|(date, total)| DailySpend { date, total })
        .collect();
    daily_spend.sort_by_key(|d| d.date);

    Ok(HistoricMonthReport {
        month,
        pots,
        top_merchants,
        daily_spend,
    })
}

/// Returns the last twelve snapshots (newest first) and their totals.
pub async fn get_yearly_historic_data(db: &DatabaseConnection) -> Result<YearlyHistoricData> {
    let months = HistoricMonth::find()
        .order_by_desc(historic_month::Column::DateAdded)
        .order_by_desc(historic_month::Column::Id)
        .limit(12)
        .all(db)
        .await?;

    Ok(YearlyHistoricData {
        total_income: months.iter().map(|m| m.monthly_income).sum(),
        total_spent: months.iter().map(|m| m.amount_spent).sum(),
        total_saved: months.iter().map(|m| m.amount_saved).sum(),
        months,
    })
}
