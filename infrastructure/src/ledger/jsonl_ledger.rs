//! JSONL file ledger.
//!
//! Each [`LedgerEntry`] is serialized as a single JSON line (the artifact's
//! fields plus `logged_at`) and appended to the file. Earlier lines are never
//! rewritten.

use async_trait::async_trait;
use boardroom_application::ports::decision_ledger::{DecisionLedger, LedgerError, LedgerReplay};
use boardroom_domain::{DecisionArtifact, LedgerEntry};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Append-only decision ledger backed by a JSON Lines file.
///
/// Appends are serialised by an async mutex and synced to disk before
/// `append` returns. The file and its parent directories are created on the
/// first append; until then the ledger reads as empty.
pub struct JsonlDecisionLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlDecisionLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the path to the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn open_for_append(&self) -> std::io::Result<File> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .await
    }

    /// Whether the last record was cut short (no trailing newline).
    async fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
        if file.metadata().await?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1)).await?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).await?;
        Ok(last[0] != b'\n')
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = self.open_for_append().await?;

        if Self::ends_mid_line(&mut file).await? {
            warn!(
                "Ledger {} ends with a truncated record; starting a new line",
                self.path.display()
            );
            file.write_all(b"\n").await?;
        }

        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        file.sync_data().await
    }
}

#[async_trait]
impl DecisionLedger for JsonlDecisionLedger {
    async fn append(&self, artifact: &DecisionArtifact) -> Result<LedgerEntry, LedgerError> {
        let _guard = self.lock.lock().await;

        // Stamped under the lock so `logged_at` follows file order
        let entry = LedgerEntry::stamp(artifact.clone());
        let line = serde_json::to_string(&entry)?;

        self.write_line(&line)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!("Appended {} to {}", entry.id, self.path.display());
        Ok(entry)
    }

    async fn read_all(&self) -> Result<LedgerReplay, LedgerError> {
        let _guard = self.lock.lock().await;

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerReplay::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut replay = LedgerReplay::default();
        for (index, line) in bytes.split(|b| *b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<LedgerEntry>(line) {
                Ok(entry) => replay.entries.push(entry),
                Err(e) => {
                    warn!(
                        "Skipping unreadable ledger record at {}:{}: {}",
                        self.path.display(),
                        index + 1,
                        e
                    );
                    replay.skipped += 1;
                }
            }
        }

        Ok(replay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::{DecisionMode, EvidenceMessage, GovernancePolicy, Outcome};
    use std::sync::Arc;

    fn artifact(topic: &str) -> DecisionArtifact {
        DecisionArtifact::decide(
            &GovernancePolicy::default(),
            topic,
            vec![
                EvidenceMessage::approve(topic, "CFO").with_attribute("budget", 1200),
                EvidenceMessage::approve(topic, "CTO").with_source("eng-review"),
            ],
        )
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonlDecisionLedger::new(dir.path().join("ledger.jsonl"));

        let mut written = Vec::new();
        for topic in ["Expand EU market", "Hire VP Sales", "Close Tokyo office"] {
            written.push(ledger.append(&artifact(topic)).await.unwrap());
        }

        let replay = ledger.read_all().await.unwrap();
        assert_eq!(replay.skipped, 0);
        assert_eq!(replay.entries, written);
    }

    #[tokio::test]
    async fn test_lines_are_flat_json_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = JsonlDecisionLedger::new(&path);
        ledger.append(&artifact("Hire VP Sales")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["topic"], "Hire VP Sales");
        assert_eq!(value["outcome"], "APPROVE");
        assert_eq!(value["evidence"][0]["budget"], 1200);
        assert!(value["logged_at"].is_string());
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty_and_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("ledger.jsonl");
        let ledger = JsonlDecisionLedger::new(&path);

        let replay = ledger.read_all().await.unwrap();
        assert!(replay.entries.is_empty());
        assert_eq!(replay.skipped, 0);
        assert!(!path.exists());

        ledger.append(&artifact("First")).await.unwrap();
        assert!(path.exists());
        assert_eq!(ledger.read_all().await.unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_and_truncated_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = JsonlDecisionLedger::new(&path);

        ledger.append(&artifact("Good one")).await.unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"{\"this is\": not json}\n\n").unwrap();
            file.write_all(b"{\"id\":\"dec-cut\",\"topic\":\"Half wri").unwrap();
        }

        let replay = ledger.read_all().await.unwrap();
        assert_eq!(replay.entries.len(), 1);
        assert_eq!(replay.skipped, 2);

        // The next append must not be glued onto the truncated tail
        ledger.append(&artifact("After crash")).await.unwrap();
        let replay = ledger.read_all().await.unwrap();
        let topics: Vec<&str> = replay.entries.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["Good one", "After crash"]);
        assert_eq!(replay.skipped, 2);
    }

    #[tokio::test]
    async fn test_escalation_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonlDecisionLedger::new(dir.path().join("ledger.jsonl"));
        let policy = GovernancePolicy::new(DecisionMode::Quorum).with_quorum(["CFO", "Legal"], 2);
        let escalated = DecisionArtifact::decide(
            &policy,
            "Acquire startup",
            vec![EvidenceMessage::approve("Acquire startup", "CFO")],
        );
        assert_eq!(escalated.outcome, Outcome::Escalate);

        let written = ledger.append(&escalated).await.unwrap();
        let replay = ledger.read_all().await.unwrap();
        assert_eq!(replay.entries, vec![written]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(JsonlDecisionLedger::new(dir.path().join("ledger.jsonl")));

        let mut handles = Vec::new();
        for i in 0..24 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger.append(&artifact(&format!("topic-{i}"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let replay = ledger.read_all().await.unwrap();
        assert_eq!(replay.skipped, 0);
        assert_eq!(replay.entries.len(), 24);
        assert!(
            replay
                .entries
                .windows(2)
                .all(|w| w[0].logged_at <= w[1].logged_at)
        );
    }
}
