//! Application-level configuration.
//!
//! - [`IntegratorConfig`]: bounds on the integrator's collaborators (ledger timeout)
//!
//! Governance rules live in the domain ([`boardroom_domain::GovernancePolicy`]).

pub mod integrator_config;

pub use integrator_config::IntegratorConfig;
