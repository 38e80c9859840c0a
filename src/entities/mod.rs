//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod automatic_rule;
pub mod historic_month;
pub mod historic_pot;
pub mod savings_pot;
pub mod spending_pot;
pub mod transaction;
pub mod transaction_split;

// Re-export specific types to avoid conflicts
pub use automatic_rule::{
    Column as AutomaticRuleColumn, Entity as AutomaticRule, Model as AutomaticRuleModel,
};
pub use historic_month::{
    Column as HistoricMonthColumn, Entity as HistoricMonth, Model as HistoricMonthModel,
};
pub use historic_pot::{
    Column as HistoricPotColumn, Entity as HistoricPot, Model as HistoricPotModel,
};
pub use savings_pot::{Column as SavingsPotColumn, Entity as SavingsPot, Model as SavingsPotModel};
pub use spending_pot::{
    Column as SpendingPotColumn, Entity as SpendingPot, Model as SpendingPotModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use transaction_split::{
    Column as TransactionSplitColumn, Entity as TransactionSplit, Model as TransactionSplitModel,
};
