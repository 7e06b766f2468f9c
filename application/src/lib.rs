//! Application layer for boardroom
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::IntegratorConfig;
pub use ports::{
    decision_ledger::{DecisionLedger, InMemoryDecisionLedger, LedgerError, LedgerReplay},
    decision_notifier::{DecisionNotifier, NoNotifier},
};
pub use use_cases::explore_ledger::LedgerExplorer;
pub use use_cases::ingest_evidence::{IngestEvidenceUseCase, IngestOptions, IngestReport};
pub use use_cases::integrate_decision::{DecisionIntegrator, IntegrateError};
