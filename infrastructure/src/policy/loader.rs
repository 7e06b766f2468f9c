//! Governance policy document loader
//!
//! Reads a TOML, YAML or JSON document (chosen by file extension, TOML when
//! the extension is unknown) and layers it over the built-in defaults, so
//! every omitted field keeps its default value.

use super::file_policy::FilePolicy;
use boardroom_domain::{GovernancePolicy, Severity};
use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Fatal problems with a policy document
#[derive(Error, Debug)]
pub enum PolicyLoadError {
    #[error("Policy file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Could not read policy file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
}

/// Document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    Toml,
    Yaml,
    Json,
}

impl PolicyFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => PolicyFormat::Yaml,
            Some("json") => PolicyFormat::Json,
            _ => PolicyFormat::Toml,
        }
    }
}

/// Loads [`GovernancePolicy`] documents
pub struct PolicyLoader;

impl PolicyLoader {
    /// Load and validate the policy at `path`.
    ///
    /// Validation issues are logged, never fatal.
    pub fn load(path: &Path) -> Result<GovernancePolicy, PolicyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PolicyLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => PolicyLoadError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let policy = Self::parse(&content, PolicyFormat::from_path(path)).map_err(|source| {
            PolicyLoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!("Loaded {} policy from {}", policy.mode, path.display());
        Self::report_issues(&policy);
        Ok(policy)
    }

    /// Parse a policy document held in memory
    pub fn parse(
        content: &str,
        format: PolicyFormat,
    ) -> Result<GovernancePolicy, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FilePolicy::default()));
        let figment = match format {
            PolicyFormat::Toml => figment.merge(Toml::string(content)),
            PolicyFormat::Yaml => figment.merge(Yaml::string(content)),
            PolicyFormat::Json => figment.merge(Json::string(content)),
        };

        let file: FilePolicy = figment.extract().map_err(Box::new)?;
        Ok(file.into_policy())
    }

    fn report_issues(policy: &GovernancePolicy) {
        if policy.uses_baseline_roles() {
            debug!("No required_roles in policy; using the baseline roles");
        }
        for issue in policy.validate() {
            match issue.severity {
                Severity::Error => warn!("Policy error: {}", issue.message),
                Severity::Warning => warn!("Policy warning: {}", issue.message),
            }
        }
    }
}
