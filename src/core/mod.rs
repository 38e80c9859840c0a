//! Core business logic for the pot ledger.
//!
//! Framework-agnostic operations over the store: pot management, merchant
//! rules, transaction ingestion and allocation, month rollover, and
//! read-only stats. Every mutating operation here runs inside a single
//! database transaction.

/// Single-pot transaction allocation
pub mod allocation;
/// Bank feed ingestion entry point
pub mod ingest;
/// Spending and savings pot store
pub mod pot;
/// Bounded retry on transient write conflicts
pub mod retry;
/// Month rollover and historic snapshots
pub mod rollover;
/// Automatic merchant categorisation rules
pub mod rules;
/// Split allocation across several pots
pub mod split;
/// Read-only stats projections
pub mod stats;
/// Transaction query helpers
pub mod transaction;
