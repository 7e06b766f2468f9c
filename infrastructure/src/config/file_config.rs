//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the application config
//! file. Governance rules are not configured here; `[policy] path` only says
//! where the policy document lives.

use boardroom_application::IntegratorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default ledger append timeout, in milliseconds.
pub const DEFAULT_LEDGER_TIMEOUT_MS: u64 = 5_000;

/// Raw policy section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    /// Policy document (TOML, YAML or JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Raw ledger section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLedgerConfig {
    /// Overrides the policy's `logging.ledger_path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Append timeout in milliseconds; 0 waits indefinitely
    pub timeout_ms: u64,
}

impl Default for FileLedgerConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_ms: DEFAULT_LEDGER_TIMEOUT_MS,
        }
    }
}

impl FileLedgerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Complete application configuration file
///
/// ```toml
/// [policy]
/// path = "governance.toml"
///
/// [ledger]
/// path = "var/decisions.jsonl"
/// timeout_ms = 2000
///
/// [output]
/// color = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub policy: FilePolicyConfig,
    pub ledger: FileLedgerConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    pub fn policy_path(&self) -> Option<PathBuf> {
        self.policy.path.as_ref().map(PathBuf::from)
    }

    /// Ledger path override, if configured
    pub fn ledger_path(&self) -> Option<PathBuf> {
        self.ledger.path.as_ref().map(PathBuf::from)
    }

    /// Convert to the integrator's runtime parameters
    pub fn integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig::default().with_ledger_timeout(self.ledger.timeout())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
