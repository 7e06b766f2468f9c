//! Output formatter trait

use boardroom_domain::{DecisionArtifact, LedgerEntry, OutcomeSummary, PolicyIssue};

/// Trait for rendering decisions and ledger views
pub trait OutputFormatter: Send + Sync {
    /// A decision as it is made
    fn format_decision(&self, artifact: &DecisionArtifact) -> String;

    /// A ledger listing
    fn format_entries(&self, entries: &[LedgerEntry]) -> String;

    /// One ledger entry in full
    fn format_entry(&self, entry: &LedgerEntry) -> String;

    /// Outcome counts
    fn format_summary(&self, summary: &OutcomeSummary) -> String;

    /// Policy validation results
    fn format_issues(&self, issues: &[PolicyIssue]) -> String;
}
