//! Governance policy loading
//!
//! Provides [`PolicyLoader`], which turns a human-authored TOML, YAML or JSON
//! document into a [`GovernancePolicy`](boardroom_domain::GovernancePolicy).

mod file_policy;
mod loader;

pub use file_policy::FilePolicy;
pub use loader::{PolicyFormat, PolicyLoadError, PolicyLoader};
