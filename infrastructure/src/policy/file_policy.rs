//! Raw policy document types
//!
//! Mirrors [`GovernancePolicy`] field for field, except that `mode` stays a
//! string until conversion so an unrecognised mode can fall back instead of
//! failing the whole document.

use boardroom_domain::{
    AssignmentDefaults, DecisionMode, EscalationRule, GovernancePolicy, LoggingPolicy,
    QuorumRequirement,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Policy document as written by a human
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub weights: BTreeMap<String, f64>,
    pub veto_roles: BTreeSet<String>,
    pub quorum: QuorumRequirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<BTreeSet<String>>,
    pub escalation: EscalationRule,
    pub assignments: AssignmentDefaults,
    pub logging: LoggingPolicy,
}

impl FilePolicy {
    /// Parse the mode string.
    ///
    /// Missing mode means CONSENSUS. Anything unrecognised becomes
    /// DEFAULT_APPROVE with a warning.
    pub fn parse_mode(&self) -> DecisionMode {
        match self.mode.as_deref() {
            None => DecisionMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}; falling back to {}", e, DecisionMode::DefaultApprove);
                DecisionMode::DefaultApprove
            }),
        }
    }

    pub fn into_policy(self) -> GovernancePolicy {
        let mode = self.parse_mode();
        GovernancePolicy {
            mode,
            weights: self.weights,
            veto_roles: self.veto_roles,
            quorum: self.quorum,
            required_roles: self.required_roles,
            escalation: self.escalation,
            assignments: self.assignments,
            logging: self.logging,
        }
    }
}
