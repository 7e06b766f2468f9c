//! Governance policy: the immutable rules a session decides by.
//!
//! A [`GovernancePolicy`] is built once (normally by the infrastructure
//! policy loader) and shared read-only with the integrator. Every field has a
//! safe default so a near-empty policy document still yields a working
//! CONSENSUS policy.

use super::mode::DecisionMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Roles a non-QUORUM round waits for when the policy names none.
///
/// Compatibility default: rounds for topics that never hear from all four
/// of these roles do not complete on their own. Set
/// [`GovernancePolicy::required_roles`] to override.
pub const BASELINE_ROLES: [&str; 4] = ["CFO", "CTO", "COO", "Investor"];

/// Default ledger file, relative to the working directory.
pub const DEFAULT_LEDGER_PATH: &str = "decision_ledger.jsonl";

/// Participation requirements for QUORUM mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumRequirement {
    pub required_roles: BTreeSet<String>,
    pub minimum_votes: usize,
}

/// Who takes over when a round cannot be resolved by policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationRule {
    pub fallback_role: String,
    pub notify_roles: BTreeSet<String>,
    pub action: String,
}

impl Default for EscalationRule {
    fn default() -> Self {
        Self {
            fallback_role: "Chair".to_string(),
            notify_roles: BTreeSet::new(),
            action: "review".to_string(),
        }
    }
}

/// Defaults for the follow-up assignment attached to every decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentDefaults {
    pub default_owner: String,
    pub default_due_days: u32,
    pub dependency_map: BTreeMap<String, Vec<String>>,
}

impl Default for AssignmentDefaults {
    fn default() -> Self {
        Self {
            default_owner: "COO".to_string(),
            default_due_days: 14,
            dependency_map: BTreeMap::new(),
        }
    }
}

impl AssignmentDefaults {
    /// All dependency lists merged into one, in key order.
    ///
    /// Not topic-aware: every decision carries the full combined list.
    pub fn flattened_dependencies(&self) -> Vec<String> {
        self.dependency_map.values().flatten().cloned().collect()
    }
}

/// Ledger-related options carried by the policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPolicy {
    pub ledger_path: String,
    pub include_evidence: bool,
}

impl Default for LoggingPolicy {
    fn default() -> Self {
        Self {
            ledger_path: DEFAULT_LEDGER_PATH.to_string(),
            include_evidence: true,
        }
    }
}

/// The complete governance policy for a session.
///
/// # Example
///
/// ```
/// use boardroom_domain::{DecisionMode, GovernancePolicy};
///
/// let policy = GovernancePolicy::new(DecisionMode::Weighted)
///     .with_weight("Investor", 3.0)
///     .with_veto_role("CFO");
///
/// assert_eq!(policy.weight_of("Investor"), 3.0);
/// assert_eq!(policy.weight_of("CTO"), 1.0); // unweighted roles count once
/// assert!(policy.is_veto_role("CFO"));
/// assert_eq!(policy.readiness_roles().len(), 4); // baseline roles
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernancePolicy {
    pub mode: DecisionMode,
    pub weights: BTreeMap<String, f64>,
    pub veto_roles: BTreeSet<String>,
    pub quorum: QuorumRequirement,
    /// Roles every non-QUORUM round waits for (`None` = [`BASELINE_ROLES`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<BTreeSet<String>>,
    pub escalation: EscalationRule,
    pub assignments: AssignmentDefaults,
    pub logging: LoggingPolicy,
}

impl GovernancePolicy {
    pub fn new(mode: DecisionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Weight of a role's vote in WEIGHTED mode.
    pub fn weight_of(&self, role: &str) -> f64 {
        self.weights.get(role).copied().unwrap_or(1.0)
    }

    pub fn is_veto_role(&self, role: &str) -> bool {
        self.veto_roles.contains(role)
    }

    /// Roles a non-QUORUM round must hear from before it completes.
    pub fn readiness_roles(&self) -> BTreeSet<String> {
        match &self.required_roles {
            Some(roles) => roles.clone(),
            None => BASELINE_ROLES.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Whether the readiness roles come from the built-in baseline.
    pub fn uses_baseline_roles(&self) -> bool {
        self.required_roles.is_none()
    }

    // ==================== Builder Methods ====================

    pub fn with_weight(mut self, role: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(role.into(), weight);
        self
    }

    pub fn with_veto_role(mut self, role: impl Into<String>) -> Self {
        self.veto_roles.insert(role.into());
        self
    }

    pub fn with_quorum<I, S>(mut self, required_roles: I, minimum_votes: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quorum = QuorumRequirement {
            required_roles: required_roles.into_iter().map(Into::into).collect(),
            minimum_votes,
        };
        self
    }

    pub fn with_required_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_escalation(mut self, escalation: EscalationRule) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn with_assignments(mut self, assignments: AssignmentDefaults) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn with_include_evidence(mut self, include: bool) -> Self {
        self.logging.include_evidence = include;
        self
    }

    pub fn with_ledger_path(mut self, path: impl Into<String>) -> Self {
        self.logging.ledger_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = GovernancePolicy::default();
        assert_eq!(policy.mode, DecisionMode::Consensus);
        assert!(policy.weights.is_empty());
        assert!(policy.veto_roles.is_empty());
        assert_eq!(policy.quorum.minimum_votes, 0);
        assert!(policy.logging.include_evidence);
        assert_eq!(policy.logging.ledger_path, DEFAULT_LEDGER_PATH);
        assert!(policy.uses_baseline_roles());
    }

    #[test]
    fn test_explicit_required_roles_replace_baseline() {
        let policy = GovernancePolicy::default().with_required_roles(["CEO", "CFO"]);
        let roles = policy.readiness_roles();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("CEO"));
        assert!(!policy.uses_baseline_roles());
    }

    #[test]
    fn test_flattened_dependencies_in_key_order() {
        let mut assignments = AssignmentDefaults::default();
        assignments
            .dependency_map
            .insert("legal".to_string(), vec!["contract review".to_string()]);
        assignments.dependency_map.insert(
            "finance".to_string(),
            vec!["budget".to_string(), "forecast".to_string()],
        );

        assert_eq!(
            assignments.flattened_dependencies(),
            vec!["budget", "forecast", "contract review"]
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let policy: GovernancePolicy =
            serde_json::from_str(r#"{"mode":"WEIGHTED","escalation":{"action":"board vote"}}"#)
                .unwrap();
        assert_eq!(policy.mode, DecisionMode::Weighted);
        assert_eq!(policy.escalation.action, "board vote");
        assert_eq!(policy.escalation.fallback_role, "Chair");
        assert_eq!(policy.assignments.default_due_days, 14);
    }
}
