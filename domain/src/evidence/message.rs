//! Evidence messages: the inbound unit of a decision round.

use super::vote::Vote;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single piece of evidence (and vote) contributed by a role.
///
/// `topic` and `role` are optional on the wire: a message missing either is
/// still accepted as evidence, it just cannot satisfy role-based readiness.
/// Any keys beyond the known fields are kept in `attributes` and written back
/// out unchanged.
///
/// # Example
///
/// ```
/// use boardroom_domain::{EvidenceMessage, Vote};
///
/// let msg: EvidenceMessage =
///     serde_json::from_str(r#"{"topic":"Expand EU market","role":"CFO","margin":0.12}"#).unwrap();
/// assert_eq!(msg.vote, Vote::Approve); // absent vote defaults to approve
/// assert_eq!(msg.attributes["margin"], 0.12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free-form payload
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl EvidenceMessage {
    pub fn new(topic: impl Into<String>, role: impl Into<String>, vote: Vote) -> Self {
        Self {
            topic: Some(topic.into()),
            role: Some(role.into()),
            vote,
            source: None,
            attributes: Map::new(),
        }
    }

    pub fn approve(topic: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new(topic, role, Vote::Approve)
    }

    pub fn reject(topic: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new(topic, role, Vote::Reject)
    }

    /// Evidence with no role attached.
    pub fn anonymous(topic: impl Into<String>, vote: Vote) -> Self {
        Self {
            topic: Some(topic.into()),
            role: None,
            vote,
            source: None,
            attributes: Map::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Parse one JSON Lines record.
    pub fn from_json_line(line: &str) -> Result<Self, DomainError> {
        serde_json::from_str(line.trim()).map_err(|e| DomainError::InvalidEvidence(e.to_string()))
    }

    /// Topic, treating blank strings as missing.
    pub fn topic(&self) -> Option<&str> {
        non_blank(self.topic.as_deref())
    }

    /// Role, treating blank strings as missing.
    pub fn role(&self) -> Option<&str> {
        non_blank(self.role.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize() {
        let msg: EvidenceMessage = serde_json::from_str(r#"{"note":"late numbers"}"#).unwrap();
        assert!(msg.topic().is_none());
        assert!(msg.role().is_none());
        assert_eq!(msg.vote, Vote::Approve);
        assert_eq!(msg.attributes["note"], "late numbers");
    }

    #[test]
    fn test_from_json_line() {
        let msg = EvidenceMessage::from_json_line(
            r#"  {"topic":"Budget","role":"CTO","vote":"reject","source":"eng"}  "#,
        )
        .unwrap();
        assert_eq!(msg.role(), Some("CTO"));
        assert_eq!(msg.vote, Vote::Reject);
        assert!(msg.attributes.is_empty());

        let err = EvidenceMessage::from_json_line("{not json").unwrap_err();
        assert!(matches!(err, DomainError::InvalidEvidence(_)));

        assert!(EvidenceMessage::from_json_line(r#"{"vote":"abstain"}"#).is_err());

        let mixed =
            EvidenceMessage::from_json_line(r#"{"topic":"Budget","role":"COO","vote":"rEjEcT"}"#)
                .unwrap();
        assert_eq!(mixed.vote, Vote::Reject);
    }

    #[test]
    fn test_blank_role_is_missing() {
        let msg = EvidenceMessage::approve("Budget", "   ");
        assert!(msg.role().is_none());
        assert_eq!(msg.topic(), Some("Budget"));
    }

    #[test]
    fn test_serialize_keeps_attributes_flat() {
        let msg = EvidenceMessage::reject("Budget", "CFO")
            .with_source("finance-agent")
            .with_attribute("burn", 3);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["vote"], "REJECT");
        assert_eq!(value["source"], "finance-agent");
        assert_eq!(value["burn"], 3);
        assert!(value.get("attributes").is_none());

        let back: EvidenceMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }
}
