//! Decision notification port
//!
//! Defines the interface for observing the integrator: evidence buffering,
//! completed decisions ("decision" events) and persistence failures.

use boardroom_domain::{DecisionArtifact, Readiness};

/// Callback for integrator events
///
/// Implementations live in the presentation layer and can display events in
/// various ways (console, structured log, downstream queue, etc.)
pub trait DecisionNotifier: Send + Sync {
    /// Called after a message joins a round that is not ready yet
    fn on_evidence_buffered(&self, _topic: &str, _readiness: &Readiness) {}

    /// Called once a decision has been durably appended to the ledger
    fn on_decision(&self, artifact: &DecisionArtifact);

    /// Called when a computed decision could not be persisted
    fn on_persist_failed(&self, _topic: &str, _error: &str) {}
}

/// No-op notifier for when events are not needed
pub struct NoNotifier;

impl DecisionNotifier for NoNotifier {
    fn on_decision(&self, _artifact: &DecisionArtifact) {}
}
