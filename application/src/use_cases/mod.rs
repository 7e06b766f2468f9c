//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod explore_ledger;
pub mod ingest_evidence;
pub mod integrate_decision;
