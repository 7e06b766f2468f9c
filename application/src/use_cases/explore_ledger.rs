//! Ledger exploration use case
//!
//! Read-only queries over the full decision history. Every call replays the
//! ledger, so results always reflect appends made before the call.

use crate::ports::decision_ledger::{DecisionLedger, LedgerError};
use boardroom_domain::{DecisionId, LedgerEntry, LedgerQuery, OutcomeSummary};
use std::sync::Arc;
use tracing::{debug, warn};

/// Query surface over a [`DecisionLedger`].
pub struct LedgerExplorer<L: DecisionLedger + 'static> {
    ledger: Arc<L>,
}

impl<L: DecisionLedger + 'static> LedgerExplorer<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Entries matching every filter in `query`, in append order.
    pub async fn query(&self, query: &LedgerQuery) -> Result<Vec<LedgerEntry>, LedgerError> {
        let entries = self.replay().await?;
        let total = entries.len();
        let matched = query.apply(entries);
        debug!("Ledger query matched {} of {} entries", matched.len(), total);
        Ok(matched)
    }

    /// The `n` most recent entries, newest first.
    pub async fn most_recent(&self, n: usize) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut entries = self.query(&LedgerQuery::new().last(n)).await?;
        entries.reverse();
        Ok(entries)
    }

    /// Look up a single decision by id.
    pub async fn find(&self, id: &DecisionId) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.replay().await?.into_iter().find(|e| &e.id == id))
    }

    /// Outcome counts over the whole ledger, plus the skipped-record count.
    pub async fn summary(&self) -> Result<OutcomeSummary, LedgerError> {
        let replay = self.ledger.read_all().await?;
        let mut summary = OutcomeSummary::from_entries(&replay.entries);
        summary.skipped = replay.skipped;
        Ok(summary)
    }

    async fn replay(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let replay = self.ledger.read_all().await?;
        if replay.skipped > 0 {
            warn!("Skipped {} unreadable ledger records", replay.skipped);
        }
        Ok(replay.entries)
    }
}
