//! Decision modes for governance policies.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a completed round's votes are turned into an outcome.
///
/// - `Consensus`: every vote must approve (default)
/// - `Weighted`: approving weight must strictly exceed half the voting weight
/// - `Quorum`: enough of the right roles must take part
/// - `DefaultApprove`: permissive fallback, always approves
///
/// # Example
///
/// ```
/// use boardroom_domain::DecisionMode;
///
/// assert_eq!("weighted".parse::<DecisionMode>().ok(), Some(DecisionMode::Weighted));
/// assert_eq!("default-approve".parse::<DecisionMode>().ok(), Some(DecisionMode::DefaultApprove));
/// assert_eq!(DecisionMode::default(), DecisionMode::Consensus);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionMode {
    #[default]
    Consensus,
    Weighted,
    Quorum,
    DefaultApprove,
}

impl DecisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionMode::Consensus => "CONSENSUS",
            DecisionMode::Weighted => "WEIGHTED",
            DecisionMode::Quorum => "QUORUM",
            DecisionMode::DefaultApprove => "DEFAULT_APPROVE",
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            DecisionMode::Consensus => "consensus (all must approve)",
            DecisionMode::Weighted => "weighted (strict majority by weight)",
            DecisionMode::Quorum => "quorum (required roles and minimum votes)",
            DecisionMode::DefaultApprove => "default approve (permissive)",
        }
    }
}

impl std::fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "consensus" => Ok(DecisionMode::Consensus),
            "weighted" => Ok(DecisionMode::Weighted),
            "quorum" => Ok(DecisionMode::Quorum),
            "default_approve" | "default" => Ok(DecisionMode::DefaultApprove),
            _ => Err(DomainError::InvalidMode(format!(
                "{}. Valid: consensus, weighted, quorum, default_approve",
                s
            ))),
        }
    }
}
