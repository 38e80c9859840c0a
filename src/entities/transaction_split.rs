//! Transaction split entity - one slice of a split-allocated transaction.
//!
//! `pot_id = NULL` marks a slice that is explicitly excluded from pot
//! tracking (e.g. a reimbursed portion). The wire-level `-1` sentinel never
//! reaches this table; [`crate::api`] converts it at the boundary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction split database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_splits")]
pub struct Model {
    /// Unique identifier for the split row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Transaction this slice belongs to
    pub transaction_id: i64,
    /// Pot this slice is allocated to; `None` means excluded from tracking
    pub pot_id: Option<i64>,
    /// Slice amount in minor units; always positive
    pub amount: i64,
}

/// Defines relationships between splits and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each split belongs to one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
    /// Each split optionally references one spending pot
    #[sea_orm(
        belongs_to = "super::spending_pot::Entity",
        from = "Column::PotId",
        to = "super::spending_pot::Column::Id"
    )]
    SpendingPot,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::spending_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpendingPot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
