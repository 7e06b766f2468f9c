//! Vote tally for a single decision round.

use crate::evidence::{EvidenceMessage, Vote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One role's final position within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleVote {
    pub role: String,
    pub vote: Vote,
}

/// The `role → last-seen vote` view of a round's evidence.
///
/// Roles keep the position of their first message (stable tie-break order),
/// but a later message from the same role overwrites the vote. Messages
/// without a role are counted but carry no vote.
///
/// # Example
///
/// ```
/// use boardroom_domain::{EvidenceMessage, Vote, VoteTally};
///
/// let evidence = vec![
///     EvidenceMessage::reject("Budget", "CFO"),
///     EvidenceMessage::approve("Budget", "CTO"),
///     EvidenceMessage::approve("Budget", "CFO"), // CFO changes their mind
/// ];
/// let tally = VoteTally::from_evidence(&evidence);
///
/// assert_eq!(tally.distinct_roles(), 2);
/// assert_eq!(tally.vote_of("CFO"), Some(Vote::Approve));
/// assert_eq!(tally.votes()[0].role, "CFO"); // first-seen order kept
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    votes: Vec<RoleVote>,
    anonymous: usize,
}

impl VoteTally {
    pub fn from_evidence(evidence: &[EvidenceMessage]) -> Self {
        let mut tally = Self::default();
        for message in evidence {
            tally.record(message);
        }
        tally
    }

    /// Rebuild a tally from persisted votes (later entries for a role win).
    pub fn from_votes<I>(votes: I) -> Self
    where
        I: IntoIterator<Item = RoleVote>,
    {
        let mut tally = Self::default();
        for RoleVote { role, vote } in votes {
            match tally.votes.iter_mut().find(|v| v.role == role) {
                Some(existing) => existing.vote = vote,
                None => tally.votes.push(RoleVote { role, vote }),
            }
        }
        tally
    }

    /// Fold one message into the tally.
    pub fn record(&mut self, message: &EvidenceMessage) {
        let Some(role) = message.role() else {
            self.anonymous += 1;
            return;
        };

        match self.votes.iter_mut().find(|v| v.role == role) {
            Some(existing) => existing.vote = message.vote,
            None => self.votes.push(RoleVote {
                role: role.to_string(),
                vote: message.vote,
            }),
        }
    }

    pub fn votes(&self) -> &[RoleVote] {
        &self.votes
    }

    pub fn into_votes(self) -> Vec<RoleVote> {
        self.votes
    }

    pub fn vote_of(&self, role: &str) -> Option<Vote> {
        self.votes.iter().find(|v| v.role == role).map(|v| v.vote)
    }

    pub fn roles(&self) -> BTreeSet<&str> {
        self.votes.iter().map(|v| v.role.as_str()).collect()
    }

    pub fn distinct_roles(&self) -> usize {
        self.votes.len()
    }

    /// Messages that carried no role.
    pub fn anonymous_count(&self) -> usize {
        self.anonymous
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Whether every role in `required` has voted.
    pub fn covers<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let seen = self.roles();
        required.into_iter().all(|r| seen.contains(r.as_str()))
    }

    /// Roles from `required` that have not voted yet.
    pub fn missing<'a, I>(&self, required: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let seen = self.roles();
        required
            .into_iter()
            .map(String::as_str)
            .filter(|r| !seen.contains(r))
            .collect()
    }

    pub fn approvals(&self) -> impl Iterator<Item = &RoleVote> {
        self.votes.iter().filter(|v| v.vote.is_approve())
    }

    pub fn rejections(&self) -> impl Iterator<Item = &RoleVote> {
        self.votes.iter().filter(|v| v.vote.is_reject())
    }

    pub fn all_approve(&self) -> bool {
        self.votes.iter().all(|v| v.vote.is_approve())
    }

    /// Generate a visual vote summary (e.g., "[●●○]")
    pub fn vote_summary(&self) -> String {
        let marks: String = self
            .votes
            .iter()
            .map(|v| if v.vote.is_approve() { '●' } else { '○' })
            .collect();
        format!("[{}]", marks)
    }
}
