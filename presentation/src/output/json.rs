//! JSON output for scripting and piping

use crate::output::formatter::OutputFormatter;
use boardroom_domain::{DecisionArtifact, LedgerEntry, OutcomeSummary, PolicyIssue, Severity};
use serde::Serialize;
use serde_json::json;

/// Formats results as JSON.
///
/// Decisions are rendered one per line so `run --json` output is itself
/// JSON Lines; everything else is pretty-printed.
pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_decision(&self, artifact: &DecisionArtifact) -> String {
        serde_json::to_string(artifact).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_entries(&self, entries: &[LedgerEntry]) -> String {
        Self::pretty(entries)
    }

    fn format_entry(&self, entry: &LedgerEntry) -> String {
        Self::pretty(entry)
    }

    fn format_summary(&self, summary: &OutcomeSummary) -> String {
        Self::pretty(summary)
    }

    fn format_issues(&self, issues: &[PolicyIssue]) -> String {
        let issues: Vec<_> = issues
            .iter()
            .map(|issue| {
                json!({
                    "severity": match issue.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    },
                    "message": issue.message,
                })
            })
            .collect();
        Self::pretty(&issues)
    }
}
