//! Domain layer for boardroom
//!
//! This crate contains the core decision logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Decision Round
//!
//! Roles (CFO, CTO, Investor, ...) send [`EvidenceMessage`]s carrying a
//! [`Vote`] on a topic. Once the round has heard from the roles the
//! [`GovernancePolicy`] requires ([`Readiness`]), the votes are folded into a
//! [`VoteTally`] and resolved into an [`Outcome`] ([`Resolution`]).
//!
//! ## Governance Policy
//!
//! - **Veto**: a REJECT from a veto role always rejects
//! - **Consensus** (default): all must approve
//! - **Weighted**: strict majority by role weight
//! - **Quorum**: required roles + minimum votes, otherwise escalate
//!
//! ## Decision Ledger
//!
//! Every completed round produces one immutable [`DecisionArtifact`], stored
//! as a [`LedgerEntry`] and queried with [`LedgerQuery`].

pub mod core;
pub mod decision;
pub mod evidence;
pub mod ledger;
pub mod policy;

// Re-export commonly used types
pub use core::error::DomainError;
pub use decision::{
    Assignment, DecisionArtifact, DecisionId, Outcome, Readiness, Resolution, RoleVote, VoteTally,
};
pub use evidence::{EvidenceMessage, Vote};
pub use ledger::{LedgerEntry, LedgerQuery, OutcomeSummary};
pub use policy::{
    AssignmentDefaults, BASELINE_ROLES, DecisionMode, EscalationRule, GovernancePolicy,
    LoggingPolicy, PolicyIssue, PolicyIssueCode, QuorumRequirement, Severity,
};
