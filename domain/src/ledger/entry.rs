//! Ledger entries: persisted decision artifacts.

use crate::decision::DecisionArtifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decision artifact as stored in the ledger, stamped with its append time.
///
/// Serialized as a single flat JSON object (the artifact's fields plus
/// `logged_at`), one per ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub artifact: DecisionArtifact,
    pub logged_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Stamp an artifact with the current time.
    pub fn stamp(artifact: DecisionArtifact) -> Self {
        Self {
            artifact,
            logged_at: Utc::now(),
        }
    }
}

impl std::ops::Deref for LedgerEntry {
    type Target = DecisionArtifact;

    fn deref(&self) -> &Self::Target {
        &self.artifact
    }
}
