//! Infrastructure layer for boardroom
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus policy and configuration file loading.

pub mod config;
pub mod ledger;
pub mod policy;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLedgerConfig, FileOutputConfig, FilePolicyConfig,
};
pub use ledger::JsonlDecisionLedger;
pub use policy::{FilePolicy, PolicyFormat, PolicyLoadError, PolicyLoader};
