//! Transaction entity - a raw "money out" bank transaction.
//!
//! Rows are created by the ingestion collaborator and mutated only by the
//! allocation services. `pot_id` is set for a single-pot allocation and is
//! always `None` while the transaction is split-allocated; the two forms are
//! mutually exclusive.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique internal identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stable external id sourced from the bank feed; ingestion dedup key
    #[sea_orm(unique)]
    pub external_id: String,
    /// Merchant name as reported by the bank
    pub merchant_name: String,
    /// Transaction amount in minor units; always positive, direction is
    /// "money out"
    pub amount: i64,
    /// Date the transaction was booked
    pub booking_date: Date,
    /// Whether a user has allocated (or explicitly unallocated) this
    /// transaction yet
    pub processed: bool,
    /// Pot this transaction is allocated to, when single-pot allocated.
    /// `None` when unallocated or when split rows exist instead.
    pub pot_id: Option<i64>,
    /// Historic snapshot this transaction was closed under; `None` until a
    /// rollover runs after the transaction is processed
    pub month_id: Option<i64>,
}

/// Defines relationships between transactions and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction optionally belongs to one spending pot
    #[sea_orm(
        belongs_to = "super::spending_pot::Entity",
        from = "Column::PotId",
        to = "super::spending_pot::Column::Id"
    )]
    SpendingPot,
    /// One transaction owns many split rows when split-allocated
    #[sea_orm(has_many = "super::transaction_split::Entity")]
    Splits,
    /// Each transaction is attributed to at most one historic snapshot
    #[sea_orm(
        belongs_to = "super::historic_month::Entity",
        from = "Column::MonthId",
        to = "super::historic_month::Column::Id"
    )]
    HistoricMonth,
}

impl Related<super::spending_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpendingPot.def()
    }
}

impl Related<super::transaction_split::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl Related<super::historic_month::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricMonth.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
