//! Presentation layer for boardroom
//!
//! This crate contains CLI definitions, output formatters and the console
//! reporter for integrator events.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, LedgerCommand, ListArgs, PolicyCommand, RunArgs};
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use progress::DecisionReporter;
