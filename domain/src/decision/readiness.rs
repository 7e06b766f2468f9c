//! Readiness: has a round heard from enough participants to be decided?

use super::tally::VoteTally;
use crate::policy::{DecisionMode, GovernancePolicy};

/// Result of checking a round against the policy's readiness criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub ready: bool,
    /// Required roles that have not voted yet
    pub missing_roles: Vec<String>,
    /// Additional distinct voters needed to reach the quorum minimum
    pub votes_short: usize,
}

impl Readiness {
    /// Evaluate readiness of a tally under a policy.
    ///
    /// - QUORUM: every `quorum.required_roles` role has voted and the number
    ///   of distinct voting roles is at least `quorum.minimum_votes`.
    /// - Every other mode: every role in [`GovernancePolicy::readiness_roles`]
    ///   has voted.
    ///
    /// In every mode at least one named role must have voted, so anonymous
    /// evidence alone never completes a round.
    pub fn evaluate(policy: &GovernancePolicy, tally: &VoteTally) -> Self {
        match policy.mode {
            DecisionMode::Quorum => {
                let required = &policy.quorum.required_roles;
                let missing_roles = owned(tally.missing(required));
                let votes_short = policy
                    .quorum
                    .minimum_votes
                    .max(1)
                    .saturating_sub(tally.distinct_roles());
                Self {
                    ready: missing_roles.is_empty() && votes_short == 0,
                    missing_roles,
                    votes_short,
                }
            }
            DecisionMode::Consensus | DecisionMode::Weighted | DecisionMode::DefaultApprove => {
                let required = policy.readiness_roles();
                let missing_roles = owned(tally.missing(&required));
                let votes_short = usize::from(tally.is_empty());
                Self {
                    ready: missing_roles.is_empty() && votes_short == 0,
                    missing_roles,
                    votes_short,
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

fn owned(roles: Vec<&str>) -> Vec<String> {
    roles.into_iter().map(str::to_string).collect()
}
