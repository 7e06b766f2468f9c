//! Ledger domain types
//!
//! The persisted form of decisions and the read-side query vocabulary. The
//! storage itself is a port in the application layer.

pub mod entry;
pub mod query;

pub use entry::LedgerEntry;
pub use query::{LedgerQuery, OutcomeSummary};
