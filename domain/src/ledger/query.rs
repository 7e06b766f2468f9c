//! Ledger queries and outcome summaries.

use super::entry::LedgerEntry;
use crate::decision::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter over ledger entries. All set filters must match (AND semantics).
///
/// # Example
///
/// ```
/// use boardroom_domain::{LedgerQuery, Outcome};
///
/// let query = LedgerQuery::new()
///     .topic_contains("eu market")
///     .outcome(Outcome::Approve)
///     .last(5);
/// assert!(!query.is_unfiltered());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerQuery {
    /// Case-insensitive substring of the topic
    pub topic: Option<String>,
    /// Role appearing in the artifact's votes or evidence
    pub role: Option<String>,
    pub outcome: Option<Outcome>,
    /// Only entries logged strictly after this instant
    pub logged_after: Option<DateTime<Utc>>,
    /// Keep only the most recent N matches
    pub last: Option<usize>,
}

impl LedgerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic_contains(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn logged_after(mut self, instant: DateTime<Utc>) -> Self {
        self.logged_after = Some(instant);
        self
    }

    pub fn last(mut self, n: usize) -> Self {
        self.last = Some(n);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single entry passes every filter (ignores `last`).
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if let Some(topic) = &self.topic
            && !entry.topic.to_lowercase().contains(&topic.to_lowercase())
        {
            return false;
        }
        if let Some(role) = &self.role
            && !entry.involves_role(role)
        {
            return false;
        }
        if let Some(outcome) = self.outcome
            && entry.outcome != outcome
        {
            return false;
        }
        if let Some(after) = self.logged_after
            && entry.logged_at <= after
        {
            return false;
        }
        true
    }

    /// Filter entries (given in append order), keeping append order.
    pub fn apply(&self, entries: Vec<LedgerEntry>) -> Vec<LedgerEntry> {
        let mut matched: Vec<LedgerEntry> =
            entries.into_iter().filter(|e| self.matches(e)).collect();
        if let Some(n) = self.last {
            let skip = matched.len().saturating_sub(n);
            matched.drain(..skip);
        }
        matched
    }
}

/// Outcome counts over a set of ledger entries.
///
/// Serializes as `{"APPROVE": n, "REJECT": n, "ESCALATE": n, "skipped": n}`;
/// all three outcome keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    #[serde(rename = "APPROVE")]
    pub approve: usize,
    #[serde(rename = "REJECT")]
    pub reject: usize,
    #[serde(rename = "ESCALATE")]
    pub escalate: usize,
    /// Ledger records that could not be parsed
    #[serde(default)]
    pub skipped: usize,
}

impl OutcomeSummary {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut summary = Self::default();
        for entry in entries {
            summary.record(entry.outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Approve => self.approve += 1,
            Outcome::Reject => self.reject += 1,
            Outcome::Escalate => self.escalate += 1,
        }
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Approve => self.approve,
            Outcome::Reject => self.reject,
            Outcome::Escalate => self.escalate,
        }
    }

    pub fn total(&self) -> usize {
        self.approve + self.reject + self.escalate
    }
}
