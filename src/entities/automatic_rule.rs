//! Automatic categorisation rule entity - maps a merchant name to a default
//! spending pot at ingestion time.
//!
//! Merchant names are unique case-insensitively; the comparison lives in
//! [`crate::core::rules`] rather than in a database collation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Automatic transaction rule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "automatic_rules")]
pub struct Model {
    /// Unique identifier for the rule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Merchant name the rule matches, compared case-insensitively
    pub merchant_name: String,
    /// Spending pot new transactions from this merchant default to
    pub pot_id: i64,
    /// Marks the rule as a recurring bill rather than ad-hoc spending
    pub is_subscription: bool,
}

/// Defines relationships between rules and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each rule targets one spending pot
    #[sea_orm(
        belongs_to = "super::spending_pot::Entity",
        from = "Column::PotId",
        to = "super::spending_pot::Column::Id"
    )]
    SpendingPot,
}

impl Related<super::spending_pot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpendingPot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
