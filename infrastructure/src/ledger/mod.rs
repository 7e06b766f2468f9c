//! Ledger persistence
//!
//! Provides [`JsonlDecisionLedger`], a JSON Lines file adapter that
//! implements the [`DecisionLedger`](boardroom_application::DecisionLedger)
//! port.

mod jsonl_ledger;

pub use jsonl_ledger::JsonlDecisionLedger;
