//! Savings pot entity - a bucket that only accumulates across cycles.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings pot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_pots")]
pub struct Model {
    /// Unique identifier for the pot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the pot (e.g., "Holiday"), unique
    #[sea_orm(unique)]
    pub name: String,
    /// Cumulative amount saved, in minor units; only explicit corrections
    /// may reduce it
    pub amount_saved: i64,
    /// Contribution made in the current cycle
    pub amount_added_this_cycle: i64,
}

/// Savings pots have no owned relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
