//! Evidence stream ingestion
//!
//! Drives a [`DecisionIntegrator`] from a JSON Lines source: one
//! [`EvidenceMessage`] per line. Blank lines are ignored; lines that fail to
//! parse are logged and counted, never fatal.

use crate::ports::decision_ledger::DecisionLedger;
use crate::use_cases::integrate_decision::{DecisionIntegrator, IntegrateError};
use boardroom_domain::{DecisionArtifact, EvidenceMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Input options for a stream run
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Decide every still-open round once the stream ends
    pub flush_at_end: bool,
}

/// What happened while ingesting a stream
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Decisions persisted, in the order they were made
    pub decisions: Vec<DecisionArtifact>,
    /// Messages accepted into the integrator
    pub accepted: usize,
    /// Lines that could not be parsed as evidence
    pub malformed: usize,
    /// Decisions computed but not persisted
    pub failures: Vec<IntegrateError>,
    /// Topics still waiting for evidence when the run ended
    pub pending_topics: Vec<String>,
}

/// Use case for feeding an evidence stream through the integrator
pub struct IngestEvidenceUseCase<'a, L: DecisionLedger + 'static> {
    integrator: &'a DecisionIntegrator<L>,
}

impl<'a, L: DecisionLedger + 'static> IngestEvidenceUseCase<'a, L> {
    pub fn new(integrator: &'a DecisionIntegrator<L>) -> Self {
        Self { integrator }
    }

    /// Read the stream to its end.
    ///
    /// Only reading the stream itself can fail; per-message problems are
    /// recorded in the report.
    pub async fn execute<R>(
        &self,
        reader: R,
        options: IngestOptions,
    ) -> std::io::Result<IngestReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut report = IngestReport::default();
        let mut lines = reader.lines();
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let message = match EvidenceMessage::from_json_line(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Skipping evidence line {}: {}", line_no, e);
                    report.malformed += 1;
                    continue;
                }
            };

            report.accepted += 1;
            match self.integrator.collect(message).await {
                Ok(Some(artifact)) => report.decisions.push(artifact),
                Ok(None) => {}
                Err(e) => report.failures.push(e),
            }
        }

        if options.flush_at_end {
            for result in self.integrator.flush_all().await {
                match result {
                    Ok(artifact) => report.decisions.push(artifact),
                    Err(e) => report.failures.push(e),
                }
            }
        }

        report.pending_topics = self.integrator.pending_topics();
        info!(
            "Evidence stream done: {} lines, {} accepted, {} decisions, {} malformed, {} pending",
            line_no,
            report.accepted,
            report.decisions.len(),
            report.malformed,
            report.pending_topics.len()
        );
        Ok(report)
    }
}
