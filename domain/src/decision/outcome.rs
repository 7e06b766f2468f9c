//! Outcome resolution under a governance policy.
//!
//! [`Resolution::resolve`] applies the veto check first, then exactly one
//! mode handler. Escalation is only produced by the QUORUM handler.

use super::tally::VoteTally;
use crate::core::error::DomainError;
use crate::policy::{DecisionMode, GovernancePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Final outcome of a decision round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Approve,
    Reject,
    /// Not resolvable by policy; handed to the escalation fallback role
    Escalate,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Approve, Outcome::Reject, Outcome::Escalate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Approve => "APPROVE",
            Outcome::Reject => "REJECT",
            Outcome::Escalate => "ESCALATE",
        }
    }

    pub fn is_escalation(&self) -> bool {
        matches!(self, Outcome::Escalate)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" => Ok(Outcome::Approve),
            "reject" | "rejected" => Ok(Outcome::Reject),
            "escalate" | "escalated" => Ok(Outcome::Escalate),
            other => Err(DomainError::InvalidOutcome(format!(
                "{}. Valid: approve, reject, escalate",
                other
            ))),
        }
    }
}

/// An outcome with its explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub rationale: String,
    /// Roles to notify (escalations only)
    pub notify: BTreeSet<String>,
}

impl Resolution {
    fn approve(rationale: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Approve,
            rationale: rationale.into(),
            notify: BTreeSet::new(),
        }
    }

    fn reject(rationale: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reject,
            rationale: rationale.into(),
            notify: BTreeSet::new(),
        }
    }

    /// Resolve a round's tally under the policy.
    ///
    /// # Example
    ///
    /// ```
    /// use boardroom_domain::{DecisionMode, EvidenceMessage, GovernancePolicy, Outcome, Resolution, VoteTally};
    ///
    /// let policy = GovernancePolicy::new(DecisionMode::Weighted)
    ///     .with_weight("A", 3.0)
    ///     .with_weight("B", 1.0)
    ///     .with_weight("C", 1.0);
    /// let tally = VoteTally::from_evidence(&[
    ///     EvidenceMessage::approve("t", "A"),
    ///     EvidenceMessage::reject("t", "B"),
    ///     EvidenceMessage::reject("t", "C"),
    /// ]);
    ///
    /// let resolution = Resolution::resolve(&policy, &tally);
    /// assert_eq!(resolution.outcome, Outcome::Approve); // 3 > 5/2
    /// ```
    pub fn resolve(policy: &GovernancePolicy, tally: &VoteTally) -> Self {
        if let Some(vetoed) = veto(policy, tally) {
            return vetoed;
        }

        match policy.mode {
            DecisionMode::Consensus => consensus(tally),
            DecisionMode::Weighted => weighted(policy, tally),
            DecisionMode::Quorum => quorum(policy, tally),
            DecisionMode::DefaultApprove => Self::approve("Default approve."),
        }
    }
}

fn veto(policy: &GovernancePolicy, tally: &VoteTally) -> Option<Resolution> {
    tally
        .rejections()
        .find(|v| policy.is_veto_role(&v.role))
        .map(|v| Resolution::reject(format!("Veto by {}", v.role)))
}

fn consensus(tally: &VoteTally) -> Resolution {
    if tally.all_approve() {
        Resolution::approve(format!(
            "Consensus required: all must agree. All {} roles approved.",
            tally.distinct_roles()
        ))
    } else {
        let dissent: Vec<&str> = tally.rejections().map(|v| v.role.as_str()).collect();
        Resolution::reject(format!(
            "Consensus required: all must agree. Rejected by {}.",
            dissent.join(", ")
        ))
    }
}

fn weighted(policy: &GovernancePolicy, tally: &VoteTally) -> Resolution {
    let score: f64 = tally.approvals().map(|v| policy.weight_of(&v.role)).sum();
    let total: f64 = tally.votes().iter().map(|v| policy.weight_of(&v.role)).sum();

    // Strict majority by weight: a tie rejects
    let rationale = format!("Weighted score {}/{} (approval needs more than half).", score, total);
    if score > total / 2.0 {
        Resolution::approve(rationale)
    } else {
        Resolution::reject(rationale)
    }
}

fn quorum(policy: &GovernancePolicy, tally: &VoteTally) -> Resolution {
    let requirement = &policy.quorum;
    let count = tally.distinct_roles();

    if tally.covers(&requirement.required_roles) && count >= requirement.minimum_votes {
        return Resolution::approve(format!(
            "Quorum met with {} votes (minimum {}).",
            count, requirement.minimum_votes
        ));
    }

    let missing = tally.missing(&requirement.required_roles);
    let escalation = &policy.escalation;
    let mut rationale = format!(
        "Quorum not met: {} of minimum {} votes",
        count, requirement.minimum_votes
    );
    if !missing.is_empty() {
        rationale.push_str(&format!(", missing {}", missing.join(", ")));
    }
    rationale.push_str(&format!(
        ". Escalated to {} for {}.",
        escalation.fallback_role, escalation.action
    ));

    Resolution {
        outcome: Outcome::Escalate,
        rationale,
        notify: escalation.notify_roles.clone(),
    }
}
