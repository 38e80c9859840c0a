//! Unified error types for the pot ledger.
//!
//! Every public operation returns [`Result`]. The variants map onto the
//! transport layer's status codes (not-found, invalid input, duplicate,
//! concurrency conflict) but the mapping itself lives outside this crate.
//! Overspending a pot is a displayable state, never an error.

use thiserror::Error;

/// All errors produced by the ledger engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced pot does not exist.
    #[error("Pot not found: {id}")]
    PotNotFound {
        /// Id of the missing pot
        id: i64,
    },

    /// A referenced transaction does not exist.
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Id of the missing transaction
        id: i64,
    },

    /// A split row referenced by a positive id does not exist.
    #[error("Transaction split not found: {id}")]
    SplitNotFound {
        /// Id of the missing split row
        id: i64,
    },

    /// A referenced automatic categorisation rule does not exist.
    #[error("Automatic rule not found: {id}")]
    RuleNotFound {
        /// Id of the missing rule
        id: i64,
    },

    /// A referenced historic month snapshot does not exist.
    #[error("Historic month not found: {id}")]
    MonthNotFound {
        /// Id of the missing snapshot
        id: i64,
    },

    /// A uniquely named row (pot or merchant rule) already exists.
    #[error("Already exists: {name}")]
    AlreadyExists {
        /// The conflicting name
        name: String,
    },

    /// A user-supplied name (pot or merchant) is empty or otherwise
    /// unusable.
    #[error("Invalid name: {message}")]
    InvalidName {
        /// Description of the validation failure
        message: String,
    },

    /// A split set is invalid: amounts exceed the transaction total,
    /// duplicate pot references, or non-positive amounts.
    #[error("Invalid allocation: {message}")]
    InvalidAllocation {
        /// Description of the validation failure
        message: String,
    },

    /// A concurrent writer prevented the operation from completing, or a
    /// delete was rejected because dependent rows exist.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict
        message: String,
    },

    /// Configuration error (missing file, bad TOML, bad environment).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration failure
        message: String,
    },

    /// Underlying database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
