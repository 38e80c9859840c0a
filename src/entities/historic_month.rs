//! Historic month entity - an immutable month-end snapshot header.
//!
//! One row is written per rollover and never mutated or deleted afterwards;
//! together with its `historic_pots` rows it is the system's audit trail.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Historic monthly data database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "historic_months")]
pub struct Model {
    /// Unique identifier for the snapshot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Moment the snapshot was taken; immutable
    pub date_added: DateTimeUtc,
    /// Income recorded for the cycle being opened
    pub monthly_income: i64,
    /// This cycle's savings contribution (not the cumulative total)
    pub amount_saved: i64,
    /// Sum of all spending pots' `amount_spent` at snapshot time
    pub amount_spent: i64,
}

/// Defines relationships between snapshot headers and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One snapshot owns a frozen copy of each spending pot
    #[sea_orm(has_many = "super::historic_pot::Entity")]
    HistoricPots,
}

impl Related<super::historic_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricPots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
