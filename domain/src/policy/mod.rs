//! Governance policy domain
//!
//! The rules a boardroom session decides by: which [`DecisionMode`] resolves a
//! round, how roles are weighted, who can veto, what quorum means, how
//! unresolved rounds escalate and what follow-up a decision assigns.

pub mod governance;
pub mod mode;
pub mod validation;

pub use governance::{
    AssignmentDefaults, BASELINE_ROLES, DEFAULT_LEDGER_PATH, EscalationRule, GovernancePolicy,
    LoggingPolicy, QuorumRequirement,
};
pub use mode::DecisionMode;
pub use validation::{PolicyIssue, PolicyIssueCode, Severity};
