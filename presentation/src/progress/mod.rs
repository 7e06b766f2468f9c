//! Progress reporting for evidence runs

pub mod reporter;

pub use reporter::DecisionReporter;
