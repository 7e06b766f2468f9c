//! Decision domain
//!
//! Pure decision logic for a boardroom round: no buffering, no I/O.
//!
//! ```text
//! evidence ──▶ VoteTally ──▶ Readiness::evaluate ──(ready)──▶ Resolution::resolve
//!                                                                  │
//!                                                                  ▼
//!                                                       DecisionArtifact::assemble
//! ```
//!
//! Resolution order: veto check, then the single handler for the policy's
//! [`DecisionMode`](crate::DecisionMode). Only QUORUM can escalate.

pub mod artifact;
pub mod outcome;
pub mod readiness;
pub mod tally;

pub use artifact::{Assignment, DecisionArtifact, DecisionId};
pub use outcome::{Outcome, Resolution};
pub use readiness::Readiness;
pub use tally::{RoleVote, VoteTally};
