//! Spending pot entity - a budget envelope for one category of spending.
//!
//! Every amount is in integer minor currency units (pence). At rest the pot
//! satisfies `amount_spent + amount_left == amount_allocated`; allocation
//! operations always move `amount_spent` and `amount_left` together.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spending pot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spending_pots")]
pub struct Model {
    /// Unique identifier for the pot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the pot (e.g., "Groceries"), unique
    #[sea_orm(unique)]
    pub name: String,
    /// Total granted this cycle, including any carried-forward amount
    pub amount_allocated: i64,
    /// The plain top-up configured by the user, excluding rollover
    pub amount_added_this_cycle: i64,
    /// Amount spent so far this cycle
    pub amount_spent: i64,
    /// Amount left this cycle; may go negative when the pot is overdrawn
    pub amount_left: i64,
}

/// Defines relationships between spending pots and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One pot has many single-pot allocated transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One pot has many automatic categorisation rules
    #[sea_orm(has_many = "super::automatic_rule::Entity")]
    AutomaticRules,
    /// One pot has many frozen historic copies
    #[sea_orm(has_many = "super::historic_pot::Entity")]
    HistoricPots,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::automatic_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutomaticRules.def()
    }
}

impl Related<super::historic_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricPots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
