//! Live reporting of integrator events

use crate::output::formatter::OutputFormatter;
use boardroom_application::DecisionNotifier;
use boardroom_domain::{DecisionArtifact, Readiness};
use colored::Colorize;

/// Prints each decision to stdout as it is made.
///
/// Buffering progress and persistence failures go to stderr so stdout stays
/// machine-readable with a JSON formatter.
pub struct DecisionReporter {
    formatter: Box<dyn OutputFormatter>,
    quiet: bool,
}

impl DecisionReporter {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            formatter,
            quiet: false,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// One-line description of what a round is still waiting for
    pub fn waiting_line(topic: &str, readiness: &Readiness) -> String {
        let mut waiting = Vec::new();
        if !readiness.missing_roles.is_empty() {
            waiting.push(readiness.missing_roles.join(", "));
        }
        if readiness.votes_short > 0 {
            waiting.push(format!("{} more votes", readiness.votes_short));
        }
        if waiting.is_empty() {
            format!("{}: buffered", topic)
        } else {
            format!("{}: waiting for {}", topic, waiting.join("; "))
        }
    }
}

impl DecisionNotifier for DecisionReporter {
    fn on_evidence_buffered(&self, topic: &str, readiness: &Readiness) {
        if !self.quiet {
            eprintln!("{} {}", "…".dimmed(), Self::waiting_line(topic, readiness).dimmed());
        }
    }

    fn on_decision(&self, artifact: &DecisionArtifact) {
        println!("{}", self.formatter.format_decision(artifact));
    }

    fn on_persist_failed(&self, topic: &str, error: &str) {
        eprintln!(
            "{} decision for '{}' not recorded: {}",
            "error:".red().bold(),
            topic,
            error
        );
    }
}
