//! Decision artifacts: the immutable record of a completed round.

use super::outcome::{Outcome, Resolution};
use super::tally::{RoleVote, VoteTally};
use crate::evidence::EvidenceMessage;
use crate::policy::{DecisionMode, GovernancePolicy};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Unique decision identifier.
///
/// A UTC timestamp (millisecond resolution) followed by a random component,
/// so two artifacts built within the same millisecond still differ and ids
/// sort roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    pub fn generate() -> Self {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ");
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("dec-{}-{}", timestamp, &random[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DecisionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DecisionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Follow-up work attached to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub owner: String,
    pub due_in_days: u32,
    pub dependencies: Vec<String>,
}

/// The record produced for a completed decision round.
///
/// Built once by the integrator when a round completes, appended once to the
/// ledger, and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionArtifact {
    pub id: DecisionId,
    pub topic: String,
    pub outcome: Outcome,
    pub rationale: String,
    /// Mode of the policy that produced this decision
    pub mode: DecisionMode,
    /// Resolved votes in first-seen order
    #[serde(default)]
    pub votes: Vec<RoleVote>,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub evidence: Vec<EvidenceMessage>,
    /// Roles to notify; only set on escalations
    #[serde(default)]
    pub notify: Vec<String>,
}

impl DecisionArtifact {
    /// Assemble the artifact for a resolved round.
    ///
    /// Evidence is kept when the policy's `include_evidence` is set; an
    /// escalation always keeps the full evidence regardless of that flag.
    pub fn assemble(
        policy: &GovernancePolicy,
        topic: impl Into<String>,
        evidence: Vec<EvidenceMessage>,
        tally: VoteTally,
        resolution: Resolution,
    ) -> Self {
        let evidence = if resolution.outcome.is_escalation() || policy.logging.include_evidence {
            evidence
        } else {
            Vec::new()
        };

        let defaults = &policy.assignments;
        let assignment = Assignment {
            owner: defaults.default_owner.clone(),
            due_in_days: defaults.default_due_days,
            dependencies: defaults.flattened_dependencies(),
        };

        Self {
            id: DecisionId::generate(),
            topic: topic.into(),
            outcome: resolution.outcome,
            rationale: resolution.rationale,
            mode: policy.mode,
            votes: tally.into_votes(),
            assignments: vec![assignment],
            evidence,
            notify: resolution.notify.into_iter().collect(),
        }
    }

    /// Resolve and assemble in one step.
    pub fn decide(
        policy: &GovernancePolicy,
        topic: impl Into<String>,
        evidence: Vec<EvidenceMessage>,
    ) -> Self {
        let tally = VoteTally::from_evidence(&evidence);
        let resolution = Resolution::resolve(policy, &tally);
        Self::assemble(policy, topic, evidence, tally, resolution)
    }

    /// Compact vote marks for listings, e.g. `[●●○]`.
    pub fn vote_summary(&self) -> String {
        VoteTally::from_votes(self.votes.iter().cloned()).vote_summary()
    }

    /// Whether `role` took part, either by vote or through evidence.
    pub fn involves_role(&self, role: &str) -> bool {
        self.votes.iter().any(|v| v.role == role)
            || self.evidence.iter().any(|e| e.role() == Some(role))
    }
}
