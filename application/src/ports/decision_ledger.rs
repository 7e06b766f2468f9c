//! Port for the append-only decision ledger.
//!
//! Defines the [`DecisionLedger`] trait that persistence adapters implement.
//! The ledger exclusively owns persisted entries: callers hand it an artifact
//! and receive back the stamped [`LedgerEntry`] that was written.
//!
//! # Contract
//!
//! - `append` never overwrites or reorders earlier records, and returns only
//!   once the record is durable. Concurrent appends must not interleave
//!   within a record.
//! - `read_all` returns records in append order. A corrupt record is skipped
//!   and counted in [`LedgerReplay::skipped`]; it never fails the whole read.
//! - A store that does not exist yet reads as empty.

use async_trait::async_trait;
use boardroom_domain::{DecisionArtifact, LedgerEntry};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by ledger adapters
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize ledger entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Ledger append timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Result of replaying the ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerReplay {
    /// Parsed entries in append order
    pub entries: Vec<LedgerEntry>,
    /// Records that could not be parsed and were skipped
    pub skipped: usize,
}

/// Append-only store of decision artifacts.
#[async_trait]
pub trait DecisionLedger: Send + Sync {
    /// Stamp and durably append one artifact.
    async fn append(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError>;

    /// Replay every record in append order.
    async fn read_all(&self) -> Result<LedgerReplay, LedgerError>;
}

/// In-process ledger for embedding and tests.
///
/// Nothing survives the process; appends are serialised by a mutex.
#[derive(Default)]
pub struct InMemoryDecisionLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl InMemoryDecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DecisionLedger for InMemoryDecisionLedger {
    async fn append(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
        let entry = LedgerEntry::stamp(artifact.clone());
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))?;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn read_all(&self) -> Result<LedgerReplay, LedgerError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))?;
        Ok(LedgerReplay {
            entries: entries.clone(),
            skipped: 0,
        })
    }
}
