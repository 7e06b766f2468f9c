//! Decision integration use case
//!
//! Buffers evidence per topic, decides when a round is ready, resolves it
//! under the governance policy and persists exactly one artifact per
//! completed round.
//!
//! # Concurrency
//!
//! Each topic has its own round, guarded by an async mutex that is held from
//! "push message" through readiness check, resolution and ledger append. A
//! message for the same topic waits until the round is committed (and then
//! starts a fresh round); messages for other topics are unaffected.
//!
//! ```text
//! collect(msg) ──▶ round(topic).lock() ──▶ push ──▶ Readiness::evaluate
//!                                                        │ ready
//!                                                        ▼
//!                                      Resolution::resolve ──▶ DecisionArtifact
//!                                                        │
//!                                       ledger.append (bounded by timeout)
//!                                          │ ok                    │ err
//!                                   clear buffer, return     keep buffer, Err
//! ```

use crate::config::IntegratorConfig;
use crate::ports::decision_ledger::{DecisionLedger, LedgerError};
use crate::ports::decision_notifier::{DecisionNotifier, NoNotifier};
use boardroom_domain::{
    DecisionArtifact, EvidenceMessage, GovernancePolicy, LedgerEntry, Readiness, Resolution,
    VoteTally,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

type Round = Arc<tokio::sync::Mutex<Vec<EvidenceMessage>>>;

/// Errors that can occur while integrating evidence
#[derive(Error, Debug)]
pub enum IntegrateError {
    /// The decision was computed but could not be persisted. The round's
    /// evidence is kept so the decision can be retried with `flush`.
    #[error("Decision for '{topic}' was not persisted: {source}")]
    Ledger {
        topic: String,
        #[source]
        source: LedgerError,
    },
}

impl IntegrateError {
    pub fn topic(&self) -> &str {
        match self {
            IntegrateError::Ledger { topic, .. } => topic,
        }
    }
}

/// Stateful collector that turns evidence into persisted decisions.
pub struct DecisionIntegrator<L: DecisionLedger + 'static> {
    policy: Arc<GovernancePolicy>,
    ledger: Arc<L>,
    config: IntegratorConfig,
    notifier: Arc<dyn DecisionNotifier>,
    rounds: Mutex<HashMap<String, Round>>,
    /// Evidence that arrived without a topic
    unscoped: Mutex<Vec<EvidenceMessage>>,
}

impl<L: DecisionLedger + 'static> DecisionIntegrator<L> {
    pub fn new(policy: Arc<GovernancePolicy>, ledger: Arc<L>) -> Self {
        Self {
            policy,
            ledger,
            config: IntegratorConfig::default(),
            notifier: Arc::new(NoNotifier),
            rounds: Mutex::new(HashMap::new()),
            unscoped: Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(mut self, config: IntegratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn DecisionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn policy(&self) -> &GovernancePolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Add one message to its topic's round.
    ///
    /// Returns `Ok(Some(artifact))` when this message completed the round and
    /// the decision was persisted, `Ok(None)` when the round is still
    /// waiting, and `Err` when a decision was computed but could not be
    /// persisted (the evidence stays buffered).
    pub async fn collect(
        &self,
        message: EvidenceMessage,
    ) -> Result<Option<DecisionArtifact>, IntegrateError> {
        let Some(topic) = message.topic().map(str::to_string) else {
            warn!(
                "Evidence without a topic kept as unscoped evidence (role: {})",
                message.role().unwrap_or("<none>")
            );
            lock(&self.unscoped).push(message);
            return Ok(None);
        };

        if message.role().is_none() {
            warn!(
                "Evidence for '{}' has no role; kept as anonymous evidence",
                topic
            );
        }

        let round = self.round(&topic);
        let result = {
            let mut buffer = round.lock().await;
            buffer.push(message);

            let tally = VoteTally::from_evidence(&buffer);
            let readiness = Readiness::evaluate(&self.policy, &tally);
            if !readiness.is_ready() {
                debug!(
                    "Round '{}' waiting: {} messages, missing roles [{}], {} votes short",
                    topic,
                    buffer.len(),
                    readiness.missing_roles.join(", "),
                    readiness.votes_short
                );
                self.notifier.on_evidence_buffered(&topic, &readiness);
                return Ok(None);
            }

            self.commit(&topic, &mut buffer, tally).await
        };

        drop(round);
        if result.is_ok() {
            self.release_if_idle(&topic);
        }
        result.map(Some)
    }

    /// Decide a topic's round now, whatever its readiness.
    ///
    /// Retries a decision whose ledger append failed, or closes a round that
    /// will never become ready (a QUORUM shortfall escalates). Returns
    /// `Ok(None)` when the topic has no buffered evidence.
    pub async fn flush(&self, topic: &str) -> Result<Option<DecisionArtifact>, IntegrateError> {
        let Some(round) = self.existing_round(topic) else {
            return Ok(None);
        };

        let result = {
            let mut buffer = round.lock().await;
            if buffer.is_empty() {
                return Ok(None);
            }
            info!(
                "Flushing round '{}' with {} messages",
                topic,
                buffer.len()
            );
            let tally = VoteTally::from_evidence(&buffer);
            self.commit(topic, &mut buffer, tally).await
        };

        drop(round);
        if result.is_ok() {
            self.release_if_idle(topic);
        }
        result.map(Some)
    }

    /// Flush every topic with buffered evidence, in topic order.
    ///
    /// A persistence failure on one topic does not stop the others; each
    /// failed round stays buffered and its error is returned in place.
    pub async fn flush_all(&self) -> Vec<Result<DecisionArtifact, IntegrateError>> {
        let mut results = Vec::new();
        for topic in self.pending_topics() {
            match self.flush(&topic).await {
                Ok(Some(artifact)) => results.push(Ok(artifact)),
                Ok(None) => {}
                Err(e) => results.push(Err(e)),
            }
        }
        results
    }

    /// Topics with buffered evidence, sorted.
    pub fn pending_topics(&self) -> Vec<String> {
        let rounds = lock(&self.rounds);
        let mut topics: Vec<String> = rounds
            .iter()
            .filter(|(_, round)| match round.try_lock() {
                Ok(buffer) => !buffer.is_empty(),
                // Busy: a message is being integrated right now
                Err(_) => true,
            })
            .map(|(topic, _)| topic.clone())
            .collect();
        topics.sort();
        topics
    }

    /// Number of messages buffered for a topic.
    pub async fn pending_count(&self, topic: &str) -> usize {
        match self.existing_round(topic) {
            Some(round) => round.lock().await.len(),
            None => 0,
        }
    }

    /// Number of messages that arrived without a topic.
    pub fn unscoped_count(&self) -> usize {
        lock(&self.unscoped).len()
    }

    /// Resolve, persist and, on success, clear the round.
    async fn commit(
        &self,
        topic: &str,
        buffer: &mut Vec<EvidenceMessage>,
        tally: VoteTally,
    ) -> Result<DecisionArtifact, IntegrateError> {
        let resolution = Resolution::resolve(&self.policy, &tally);
        let artifact =
            DecisionArtifact::assemble(&self.policy, topic, buffer.clone(), tally, resolution);

        match self.persist(&artifact).await {
            Ok(entry) => {
                buffer.clear();
                info!(
                    "Decision {} on '{}': {} ({}) logged at {}",
                    artifact.id,
                    topic,
                    artifact.outcome,
                    artifact.rationale,
                    entry.logged_at
                );
                self.notifier.on_decision(&artifact);
                Ok(artifact)
            }
            Err(e) => {
                warn!(
                    "Decision on '{}' not persisted, keeping {} messages buffered: {}",
                    topic,
                    buffer.len(),
                    e
                );
                self.notifier.on_persist_failed(topic, &e.to_string());
                Err(IntegrateError::Ledger {
                    topic: topic.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn persist(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
        match self.config.ledger_timeout {
            Some(limit) => tokio::time::timeout(limit, self.ledger.append(artifact))
                .await
                .map_err(|_| LedgerError::Timeout(limit))?,
            None => self.ledger.append(artifact).await,
        }
    }

    fn round(&self, topic: &str) -> Round {
        let mut rounds = lock(&self.rounds);
        Arc::clone(rounds.entry(topic.to_string()).or_default())
    }

    fn existing_round(&self, topic: &str) -> Option<Round> {
        lock(&self.rounds).get(topic).cloned()
    }

    /// Drop a topic's round once it is empty and nobody else holds it.
    ///
    /// Holding the map lock prevents new handles from being cloned, so a
    /// strong count of one means no task is waiting on this round.
    fn release_if_idle(&self, topic: &str) {
        let mut rounds = lock(&self.rounds);
        let idle = rounds.get(topic).is_some_and(|round| {
            Arc::strong_count(round) == 1 && round.try_lock().is_ok_and(|b| b.is_empty())
        });
        if idle {
            rounds.remove(topic);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::decision_ledger::{InMemoryDecisionLedger, LedgerReplay};
    use async_trait::async_trait;
    use boardroom_domain::{DecisionMode, Outcome, Vote};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    const BOARD: [&str; 4] = ["CFO", "CTO", "COO", "Investor"];

    fn integrator(policy: GovernancePolicy) -> DecisionIntegrator<InMemoryDecisionLedger> {
        DecisionIntegrator::new(Arc::new(policy), Arc::new(InMemoryDecisionLedger::new()))
    }

    /// Ledger that fails appends while `failing` is set.
    #[derive(Default)]
    struct FlakyLedger {
        failing: AtomicBool,
        inner: InMemoryDecisionLedger,
    }

    #[async_trait]
    impl DecisionLedger for FlakyLedger {
        async fn append(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(LedgerError::Unavailable("disk full".to_string()));
            }
            self.inner.append(artifact).await
        }

        async fn read_all(&self) -> Result<LedgerReplay, LedgerError> {
            self.inner.read_all().await
        }
    }

    /// Ledger whose appends never finish in time.
    struct StalledLedger;

    #[async_trait]
    impl DecisionLedger for StalledLedger {
        async fn append(&self, _artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(LedgerError::Unavailable("unreachable".to_string()))
        }

        async fn read_all(&self) -> Result<LedgerReplay, LedgerError> {
            Ok(LedgerReplay::default())
        }
    }

    struct CountingNotifier {
        decisions: AtomicUsize,
        buffered: AtomicUsize,
        failures: AtomicUsize,
    }

    impl DecisionNotifier for CountingNotifier {
        fn on_evidence_buffered(&self, _topic: &str, _readiness: &Readiness) {
            self.buffered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_decision(&self, _artifact: &DecisionArtifact) {
            self.decisions.fetch_add(1, Ordering::SeqCst);
        }

        fn on_persist_failed(&self, _topic: &str, _error: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_expand_eu_market_end_to_end() {
        let integrator = integrator(GovernancePolicy::default());
        let topic = "Expand EU market";

        let mut produced = Vec::new();
        for role in BOARD {
            if let Some(artifact) = integrator
                .collect(EvidenceMessage::approve(topic, role))
                .await
                .unwrap()
            {
                produced.push(artifact);
            }
        }

        assert_eq!(produced.len(), 1);
        let artifact = &produced[0];
        assert_eq!(artifact.topic, topic);
        assert_eq!(artifact.outcome, Outcome::Approve);
        assert!(artifact.rationale.contains("Consensus required"));
        assert_eq!(artifact.evidence.len(), 4);

        let replay = integrator.ledger().read_all().await.unwrap();
        assert_eq!(replay.entries.len(), 1);
        assert_eq!(replay.entries[0].artifact, *artifact);
    }

    #[tokio::test]
    async fn test_not_ready_returns_none() {
        let integrator = integrator(GovernancePolicy::default());
        for role in ["CFO", "CTO", "COO"] {
            let result = integrator
                .collect(EvidenceMessage::approve("Budget", role))
                .await
                .unwrap();
            assert!(result.is_none());
        }
        assert_eq!(integrator.pending_count("Budget").await, 3);
        assert_eq!(integrator.pending_topics(), vec!["Budget"]);
        assert!(integrator.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_quorum_rounds() {
        let policy = GovernancePolicy::new(DecisionMode::Quorum).with_quorum(["CFO", "CTO"], 2);
        let integrator = integrator(policy);

        assert!(
            integrator
                .collect(EvidenceMessage::approve("Hire", "CFO"))
                .await
                .unwrap()
                .is_none()
        );
        let artifact = integrator
            .collect(EvidenceMessage::reject("Hire", "CTO"))
            .await
            .unwrap()
            .expect("quorum reached");
        assert_eq!(artifact.outcome, Outcome::Approve);
        assert!(artifact.rationale.contains("2 votes"));
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let integrator = integrator(GovernancePolicy::default());
        for role in ["CFO", "CTO", "COO"] {
            integrator
                .collect(EvidenceMessage::approve("A", role))
                .await
                .unwrap();
        }
        // Investor votes on a different topic: A stays incomplete
        let result = integrator
            .collect(EvidenceMessage::approve("B", "Investor"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(integrator.pending_topics(), vec!["A", "B"]);

        let artifact = integrator
            .collect(EvidenceMessage::reject("A", "Investor"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artifact.topic, "A");
        assert_eq!(artifact.outcome, Outcome::Reject);
        assert!(artifact.evidence.iter().all(|e| e.topic() == Some("A")));
        assert_eq!(integrator.pending_topics(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_late_message_starts_fresh_round() {
        let integrator = integrator(GovernancePolicy::default().with_required_roles(["CFO"]));

        let first = integrator
            .collect(EvidenceMessage::approve("Budget", "CFO"))
            .await
            .unwrap();
        assert!(first.is_some());
        assert_eq!(integrator.pending_count("Budget").await, 0);

        let second = integrator
            .collect(EvidenceMessage::reject("Budget", "CFO"))
            .await
            .unwrap()
            .unwrap();
        // the new round only sees the late message
        assert_eq!(second.evidence.len(), 1);
        assert_eq!(second.outcome, Outcome::Reject);
        assert_eq!(integrator.ledger().len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_evidence_is_kept_but_never_triggers() {
        let integrator = integrator(GovernancePolicy::default().with_required_roles(["CFO"]));

        let anon = integrator
            .collect(EvidenceMessage::anonymous("Budget", Vote::Reject))
            .await
            .unwrap();
        assert!(anon.is_none());

        let artifact = integrator
            .collect(EvidenceMessage::approve("Budget", "CFO"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artifact.evidence.len(), 2);
        // anonymous reject carries no vote
        assert_eq!(artifact.outcome, Outcome::Approve);
    }

    #[tokio::test]
    async fn test_missing_topic_is_unscoped() {
        let integrator = integrator(GovernancePolicy::default().with_required_roles(["CFO"]));
        let mut message = EvidenceMessage::approve("ignored", "CFO");
        message.topic = None;

        assert!(integrator.collect(message).await.unwrap().is_none());
        assert_eq!(integrator.unscoped_count(), 1);
        assert!(integrator.pending_topics().is_empty());
        assert!(integrator.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_failure_keeps_buffer_for_flush() {
        let ledger = Arc::new(FlakyLedger::default());
        ledger.failing.store(true, Ordering::SeqCst);
        let notifier = Arc::new(CountingNotifier {
            decisions: AtomicUsize::new(0),
            buffered: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        });
        let integrator = DecisionIntegrator::new(
            Arc::new(GovernancePolicy::default().with_required_roles(["CFO", "CTO"])),
            Arc::clone(&ledger),
        )
        .with_notifier(notifier.clone());

        integrator
            .collect(EvidenceMessage::approve("Budget", "CFO"))
            .await
            .unwrap();
        let err = integrator
            .collect(EvidenceMessage::approve("Budget", "CTO"))
            .await
            .unwrap_err();
        assert_eq!(err.topic(), "Budget");
        assert!(matches!(
            err,
            IntegrateError::Ledger {
                source: LedgerError::Unavailable(_),
                ..
            }
        ));
        assert_eq!(integrator.pending_count("Budget").await, 2);

        ledger.failing.store(false, Ordering::SeqCst);
        let artifact = integrator.flush("Budget").await.unwrap().unwrap();
        assert_eq!(artifact.outcome, Outcome::Approve);
        assert_eq!(artifact.evidence.len(), 2);
        assert_eq!(integrator.pending_count("Budget").await, 0);

        assert_eq!(notifier.buffered.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.failures.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.decisions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ledger_timeout_surfaces_as_error() {
        let integrator = DecisionIntegrator::new(
            Arc::new(GovernancePolicy::default().with_required_roles(["CFO"])),
            Arc::new(StalledLedger),
        )
        .with_config(IntegratorConfig::default().with_ledger_timeout(Some(Duration::from_secs(2))));

        let err = integrator
            .collect(EvidenceMessage::approve("Budget", "CFO"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrateError::Ledger {
                source: LedgerError::Timeout(_),
                ..
            }
        ));
        assert_eq!(integrator.pending_count("Budget").await, 1);
    }

    #[tokio::test]
    async fn test_flush_escalates_quorum_shortfall() {
        let policy = GovernancePolicy::new(DecisionMode::Quorum)
            .with_quorum(["CFO", "CTO"], 2)
            .with_include_evidence(false);
        let integrator = integrator(policy);

        integrator
            .collect(EvidenceMessage::approve("Merger", "CFO"))
            .await
            .unwrap();
        let artifact = integrator.flush("Merger").await.unwrap().unwrap();
        assert_eq!(artifact.outcome, Outcome::Escalate);
        // escalations keep evidence even with include_evidence off
        assert_eq!(artifact.evidence.len(), 1);

        assert!(integrator.flush("Merger").await.unwrap().is_none());
        assert!(integrator.flush("Unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flush_all_closes_every_round() {
        let integrator = integrator(GovernancePolicy::default());
        integrator
            .collect(EvidenceMessage::approve("A", "CFO"))
            .await
            .unwrap();
        integrator
            .collect(EvidenceMessage::reject("B", "CTO"))
            .await
            .unwrap();

        let artifacts: Vec<DecisionArtifact> = integrator
            .flush_all()
            .await
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        let topics: Vec<&str> = artifacts.iter().map(|a| a.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "B"]);
        assert!(integrator.pending_topics().is_empty());
        assert_eq!(integrator.ledger().len(), 2);
    }

    /// Ledger that refuses appends for one topic only.
    struct TopicFailingLedger {
        topic: &'static str,
        inner: InMemoryDecisionLedger,
    }

    #[async_trait]
    impl DecisionLedger for TopicFailingLedger {
        async fn append(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
            if artifact.topic == self.topic {
                return Err(LedgerError::Unavailable("read-only volume".to_string()));
            }
            self.inner.append(artifact).await
        }

        async fn read_all(&self) -> Result<LedgerReplay, LedgerError> {
            self.inner.read_all().await
        }
    }

    #[tokio::test]
    async fn test_flush_all_continues_past_a_failed_topic() {
        let ledger = Arc::new(TopicFailingLedger {
            topic: "A",
            inner: InMemoryDecisionLedger::new(),
        });
        let integrator = DecisionIntegrator::new(Arc::new(GovernancePolicy::default()), ledger);
        for topic in ["A", "B", "C"] {
            integrator
                .collect(EvidenceMessage::approve(topic, "CFO"))
                .await
                .unwrap();
        }

        let results = integrator.flush_all().await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap_err().topic(), "A");
        assert_eq!(results[1].as_ref().unwrap().topic, "B");
        assert_eq!(results[2].as_ref().unwrap().topic, "C");

        // only the failed round is still open
        assert_eq!(integrator.pending_topics(), vec!["A"]);
        assert_eq!(integrator.ledger().inner.len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_evidence_alone_never_decides_an_open_round() {
        for policy in [
            GovernancePolicy::new(DecisionMode::Quorum),
            GovernancePolicy::default().with_required_roles(Vec::<String>::new()),
        ] {
            let integrator = integrator(policy);

            let anon = integrator
                .collect(EvidenceMessage::anonymous("Budget", Vote::Reject))
                .await
                .unwrap();
            assert!(anon.is_none());
            assert_eq!(integrator.pending_count("Budget").await, 1);
            assert!(integrator.ledger().is_empty());

            let artifact = integrator
                .collect(EvidenceMessage::approve("Budget", "CFO"))
                .await
                .unwrap()
                .expect("a named vote completes the round");
            assert_eq!(artifact.votes.len(), 1);
            assert_eq!(artifact.evidence.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_quorum_superset_approves() {
        let policy = GovernancePolicy::new(DecisionMode::Quorum).with_quorum(["CFO", "CTO"], 2);
        let integrator = integrator(policy);

        // COO arrives first, so the round waits for both required roles
        for role in ["COO", "CFO"] {
            assert!(
                integrator
                    .collect(EvidenceMessage::approve("Expand EU market", role))
                    .await
                    .unwrap()
                    .is_none()
            );
        }
        let artifact = integrator
            .collect(EvidenceMessage::approve("Expand EU market", "CTO"))
            .await
            .unwrap()
            .expect("quorum reached");
        assert_eq!(artifact.outcome, Outcome::Approve);
        assert!(artifact.rationale.contains("3 votes"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_collection_completes_each_topic_once() {
        let integrator = Arc::new(integrator(GovernancePolicy::default()));
        let topics = ["A", "B", "C"];

        let mut handles = Vec::new();
        for topic in topics {
            for role in BOARD {
                let integrator = Arc::clone(&integrator);
                handles.push(tokio::spawn(async move {
                    integrator
                        .collect(EvidenceMessage::approve(topic, role))
                        .await
                }));
            }
        }

        let mut completed = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                completed += 1;
            }
        }

        assert_eq!(completed, topics.len());
        let replay = integrator.ledger().read_all().await.unwrap();
        assert_eq!(replay.entries.len(), topics.len());
        assert!(replay.entries.iter().all(|e| e.evidence.len() == 4));
    }
}
