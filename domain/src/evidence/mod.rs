//! Evidence domain
//!
//! Votes and the evidence messages that carry them into a decision round.

pub mod message;
pub mod vote;

pub use message::EvidenceMessage;
pub use vote::Vote;
