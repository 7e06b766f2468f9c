//! Governance policy validation.
//!
//! A policy with questionable settings still loads (only an unreadable file is
//! fatal); these checks surface the settings that will not behave the way
//! their author probably expects.
//!
//! # Examples
//!
//! ```
//! use boardroom_domain::GovernancePolicy;
//!
//! let issues = GovernancePolicy::default().validate();
//! assert!(issues.is_empty());
//! ```

use super::governance::GovernancePolicy;
use super::mode::DecisionMode;

/// Severity level of a policy issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The setting cannot produce meaningful outcomes.
    Error,
    /// The setting works but may not behave as expected.
    Warning,
}

/// Identifies a specific policy issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyIssueCode {
    /// A weight is negative, NaN or infinite.
    InvalidWeight { role: String },
    /// Weights are configured but the mode never reads them.
    UnusedWeights,
    /// QUORUM settings make every round ready on its first named vote.
    QuorumAlwaysReady,
    /// `minimum_votes` is below the number of required roles and so has no effect.
    QuorumMinimumShadowed,
    /// `required_roles` is explicitly empty; the first named vote completes a round.
    EmptyReadinessRoles,
    /// A veto role is not among the roles a round waits for.
    VetoRoleNotRequired { role: String },
}

/// A detected issue in a governance policy.
#[derive(Debug, Clone)]
pub struct PolicyIssue {
    pub severity: Severity,
    pub code: PolicyIssueCode,
    pub message: String,
}

impl PolicyIssue {
    fn warning(code: PolicyIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    fn error(code: PolicyIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }
}

impl GovernancePolicy {
    /// Check the policy for settings that will not behave as expected.
    pub fn validate(&self) -> Vec<PolicyIssue> {
        let mut issues = Vec::new();

        for (role, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                issues.push(PolicyIssue::error(
                    PolicyIssueCode::InvalidWeight { role: role.clone() },
                    format!("weight for '{}' must be a non-negative number, got {}", role, weight),
                ));
            }
        }

        if !self.weights.is_empty() && self.mode != DecisionMode::Weighted {
            issues.push(PolicyIssue::warning(
                PolicyIssueCode::UnusedWeights,
                format!("weights are ignored in {} mode", self.mode),
            ));
        }

        let readiness = match self.mode {
            DecisionMode::Quorum => {
                let quorum = &self.quorum;
                if quorum.required_roles.is_empty() && quorum.minimum_votes <= 1 {
                    issues.push(PolicyIssue::warning(
                        PolicyIssueCode::QuorumAlwaysReady,
                        "quorum has no required roles and minimum_votes <= 1; \
                         every round completes on the first vote from a named role",
                    ));
                } else if quorum.minimum_votes > 0
                    && quorum.minimum_votes < quorum.required_roles.len()
                {
                    issues.push(PolicyIssue::warning(
                        PolicyIssueCode::QuorumMinimumShadowed,
                        format!(
                            "minimum_votes ({}) is below the {} required roles and has no effect",
                            quorum.minimum_votes,
                            quorum.required_roles.len()
                        ),
                    ));
                }
                quorum.required_roles.clone()
            }
            _ => {
                let roles = self.readiness_roles();
                if roles.is_empty() {
                    issues.push(PolicyIssue::warning(
                        PolicyIssueCode::EmptyReadinessRoles,
                        "required_roles is empty; every round completes on the first vote from a named role",
                    ));
                }
                roles
            }
        };

        if !readiness.is_empty() {
            for role in self.veto_roles.iter().filter(|r| !readiness.contains(*r)) {
                issues.push(PolicyIssue::warning(
                    PolicyIssueCode::VetoRoleNotRequired { role: role.clone() },
                    format!(
                        "veto role '{}' is not required, so rounds may complete without it",
                        role
                    ),
                ));
            }
        }

        issues
    }

    /// Check whether any issues are errors.
    pub fn has_errors(issues: &[PolicyIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
