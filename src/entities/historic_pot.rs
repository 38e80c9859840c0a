//! Historic pot entity - a frozen copy of one spending pot at rollover.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Historic pot data database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "historic_pots")]
pub struct Model {
    /// Unique identifier for the frozen copy
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Snapshot header this copy belongs to
    pub month_id: i64,
    /// Pot that was snapshotted
    pub pot_id: i64,
    /// The pot's `amount_allocated` before any reset
    pub pot_amount: i64,
    /// The pot's `amount_spent` before any reset
    pub pot_amount_spent: i64,
    /// The pot's `amount_left` before any reset
    pub pot_amount_left: i64,
}

/// Defines relationships between frozen pot copies and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each frozen copy belongs to one snapshot header
    #[sea_orm(
        belongs_to = "super::historic_month::Entity",
        from = "Column::MonthId",
        to = "super::historic_month::Column::Id"
    )]
    HistoricMonth,
    /// Each frozen copy references the live pot it was taken from
    #[sea_orm(
        belongs_to = "super::spending_pot::Entity",
        from = "Column::PotId",
        to = "super::spending_pot::Column::Id"
    )]
    SpendingPot,
}

impl Related<super::historic_month::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricMonth.def()
    }
}

impl Related<super::spending_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpendingPot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
