//! Vote primitive for boardroom decision rounds.

use serde::{Deserialize, Deserializer, Serialize};

/// A participant's position on a topic.
///
/// Serialized uppercase (`"APPROVE"` / `"REJECT"`); input is parsed through
/// [`FromStr`](std::str::FromStr), so any casing is accepted.
///
/// # Example
///
/// ```
/// use boardroom_domain::Vote;
///
/// let vote: Vote = "reject".parse().unwrap();
/// assert!(vote.is_reject());
/// assert_eq!(Vote::default(), Vote::Approve);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vote {
    #[default]
    Approve,
    Reject,
}

impl Vote {
    pub fn is_approve(&self) -> bool {
        matches!(self, Vote::Approve)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Vote::Reject)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Approve => "APPROVE",
            Vote::Reject => "REJECT",
        }
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "yes" => Ok(Vote::Approve),
            "reject" | "no" => Ok(Vote::Reject),
            other => Err(format!("Unknown vote: {}. Valid: approve, reject", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Vote {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
