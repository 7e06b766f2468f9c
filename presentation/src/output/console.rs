//! Console output formatter for decisions and the ledger

use crate::output::formatter::OutputFormatter;
use boardroom_application::IngestReport;
use boardroom_domain::core::string::{single_line, truncate};
use boardroom_domain::{
    DecisionArtifact, LedgerEntry, Outcome, OutcomeSummary, PolicyIssue, Severity, Vote,
};
use colored::{ColoredString, Colorize};

const TOPIC_WIDTH: usize = 36;

/// Formats decisions and ledger views for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a decision artifact
    pub fn decision(artifact: &DecisionArtifact) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            Self::badge(artifact.outcome),
            artifact.topic.bold()
        ));
        output.push_str(&Self::field("id", artifact.id.as_str()));
        output.push_str(&Self::field("mode", artifact.mode.as_str()));

        if !artifact.votes.is_empty() {
            let votes = artifact
                .votes
                .iter()
                .map(|v| format!("{} {}", v.role, Self::vote_mark(v.vote)))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&Self::field("votes", &votes));
        }

        output.push_str(&Self::field("rationale", &single_line(&artifact.rationale)));

        for assignment in &artifact.assignments {
            output.push_str(&Self::field(
                "owner",
                &format!("{} (due in {} days)", assignment.owner, assignment.due_in_days),
            ));
            if !assignment.dependencies.is_empty() {
                output.push_str(&Self::field("depends", &assignment.dependencies.join(", ")));
            }
        }

        if !artifact.notify.is_empty() {
            output.push_str(&Self::field(
                "notify",
                &artifact.notify.join(", ").yellow().to_string(),
            ));
        }

        output
    }

    /// Format a ledger listing, one decision per row
    pub fn entries(entries: &[LedgerEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No decisions recorded.".dimmed());
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            format!(
                "{:<16}  {:<8}  {:<10}  {:<width$}  {}",
                "LOGGED",
                "OUTCOME",
                "VOTES",
                "TOPIC",
                "ID",
                width = TOPIC_WIDTH
            )
            .dimmed()
        ));

        for entry in entries {
            output.push_str(&format!(
                "{:<16}  {}  {:<10}  {:<width$}  {}\n",
                entry.logged_at.format("%Y-%m-%d %H:%M"),
                Self::paint(entry.outcome, &format!("{:<8}", entry.outcome.as_str())),
                entry.vote_summary(),
                truncate(&single_line(&entry.topic), TOPIC_WIDTH),
                entry.id.as_str().dimmed(),
                width = TOPIC_WIDTH
            ));
        }

        output
    }

    /// Format one ledger entry including its evidence
    pub fn entry(entry: &LedgerEntry) -> String {
        let mut output = Self::decision(entry);
        output.push_str(&Self::field("logged", &entry.logged_at.to_rfc3339()));

        if entry.evidence.is_empty() {
            output.push_str(&Self::field("evidence", "not recorded"));
            return output;
        }

        output.push_str(&format!("  {}\n", "evidence".cyan()));
        for message in &entry.evidence {
            let mut line = format!(
                "    - {} {}",
                message.role().unwrap_or("(anonymous)"),
                Self::vote_mark(message.vote)
            );
            if let Some(source) = &message.source {
                line.push_str(&format!(" via {}", source));
            }
            if !message.attributes.is_empty() {
                let attributes = serde_json::Value::Object(message.attributes.clone());
                line.push_str(&format!(" {}", attributes.to_string().dimmed()));
            }
            output.push_str(&line);
            output.push('\n');
        }

        output
    }

    /// Format outcome counts
    pub fn summary(summary: &OutcomeSummary) -> String {
        let mut output = format!("{} {}\n", "Decisions:".cyan().bold(), summary.total());
        for outcome in Outcome::ALL {
            output.push_str(&format!(
                "  {} {}\n",
                Self::paint(outcome, &format!("{:<9}", outcome.as_str())),
                summary.count(outcome)
            ));
        }
        if summary.skipped > 0 {
            output.push_str(&format!(
                "  {}\n",
                format!("({} unreadable records skipped)", summary.skipped).yellow()
            ));
        }
        output
    }

    /// Format policy validation results
    pub fn issues(issues: &[PolicyIssue]) -> String {
        if issues.is_empty() {
            return format!("{}\n", "Policy OK".green().bold());
        }

        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}\n", "error:".red().bold(), issue.message),
                Severity::Warning => {
                    format!("{} {}\n", "warning:".yellow().bold(), issue.message)
                }
            })
            .collect()
    }

    /// Closing line for a `run`
    pub fn run_report(report: &IngestReport) -> String {
        let mut output = format!(
            "{} {} decisions from {} messages",
            "Done:".cyan().bold(),
            report.decisions.len(),
            report.accepted
        );
        if report.malformed > 0 {
            output.push_str(&format!(", {} malformed lines skipped", report.malformed));
        }
        if !report.failures.is_empty() {
            output.push_str(&format!(
                ", {}",
                format!("{} not persisted", report.failures.len()).red()
            ));
        }
        output.push('\n');

        if !report.pending_topics.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Still open:".yellow(),
                report.pending_topics.join(", ")
            ));
        }
        output
    }

    fn badge(outcome: Outcome) -> ColoredString {
        Self::paint(outcome, &format!("[{}]", outcome.as_str())).bold()
    }

    fn paint(outcome: Outcome, text: &str) -> ColoredString {
        match outcome {
            Outcome::Approve => text.green(),
            Outcome::Reject => text.red(),
            Outcome::Escalate => text.yellow(),
        }
    }

    fn vote_mark(vote: Vote) -> ColoredString {
        match vote {
            Vote::Approve => vote.as_str().green(),
            Vote::Reject => vote.as_str().red(),
        }
    }

    fn field(label: &str, value: &str) -> String {
        format!("  {:<10} {}\n", label.cyan(), value)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_decision(&self, artifact: &DecisionArtifact) -> String {
        Self::decision(artifact)
    }

    fn format_entries(&self, entries: &[LedgerEntry]) -> String {
        Self::entries(entries)
    }

    fn format_entry(&self, entry: &LedgerEntry) -> String {
        Self::entry(entry)
    }

    fn format_summary(&self, summary: &OutcomeSummary) -> String {
        Self::summary(summary)
    }

    fn format_issues(&self, issues: &[PolicyIssue]) -> String {
        Self::issues(issues)
    }
}
