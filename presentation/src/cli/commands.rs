//! CLI command definitions

use boardroom_domain::{LedgerQuery, Outcome};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for boardroom
#[derive(Parser, Debug)]
#[command(name = "boardroom")]
#[command(author, version, about = "Boardroom decision integration engine")]
#[command(long_about = r#"
Boardroom collects votes from board roles, applies a governance policy
(consensus, weighted, quorum or veto rules), and appends every decision to an
append-only JSONL ledger.

Configuration files are loaded from (in priority order):
1. BOARDROOM_* environment variables
2. --config <path>        Explicit config file
3. ./boardroom.toml       Project-level config
4. ~/.config/boardroom/config.toml   Global config

Example:
  boardroom run evidence.jsonl --policy governance.toml
  tail -f events.jsonl | boardroom run
  boardroom ledger list --topic eu --outcome approve --last 5
  boardroom ledger summary
  boardroom policy check --policy governance.yaml
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Governance policy document (TOML, YAML or JSON)
    #[arg(long, value_name = "PATH", global = true)]
    pub policy: Option<PathBuf>,

    /// Ledger file (overrides config and policy)
    #[arg(long, value_name = "PATH", global = true)]
    pub ledger: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Feed JSONL evidence through the integrator
    Run(RunArgs),

    /// Query the decision ledger
    #[command(subcommand)]
    Ledger(LedgerCommand),

    /// Inspect the governance policy
    #[command(subcommand)]
    Policy(PolicyCommand),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Evidence file, one JSON object per line (stdin when omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Decide every round still open when the input ends
    #[arg(long)]
    pub flush: bool,

    /// Print decisions as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Suppress per-message progress
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// List decisions, oldest first
    List(ListArgs),

    /// Count decisions by outcome
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Show one decision in full
    Show {
        /// Decision id (e.g. dec-20260101T120000000Z-1a2b3c4d5e6f)
        id: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Topic contains this text (case-insensitive)
    #[arg(long)]
    pub topic: Option<String>,

    /// Role voted or sent evidence
    #[arg(long)]
    pub role: Option<String>,

    /// approve, reject or escalate
    #[arg(long)]
    pub outcome: Option<Outcome>,

    /// Logged strictly after this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant)]
    pub after: Option<DateTime<Utc>>,

    /// Keep only the most recent N matches
    #[arg(long, value_name = "N")]
    pub last: Option<usize>,

    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Build the ledger query these flags describe
    pub fn to_query(&self) -> LedgerQuery {
        let mut query = LedgerQuery::new();
        if let Some(topic) = &self.topic {
            query = query.topic_contains(topic.clone());
        }
        if let Some(role) = &self.role {
            query = query.role(role.clone());
        }
        if let Some(outcome) = self.outcome {
            query = query.outcome(outcome);
        }
        if let Some(after) = self.after {
            query = query.logged_after(after);
        }
        if let Some(n) = self.last {
            query = query.last(n);
        }
        query
    }
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Print the effective policy (defaults filled in) as JSON
    Show,

    /// Report questionable policy settings
    Check {
        #[arg(long)]
        json: bool,
    },
}

/// Parse `--after`: a full RFC 3339 timestamp or a bare date (midnight UTC)
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "boardroom",
            "run",
            "events.jsonl",
            "--flush",
            "--policy",
            "gov.yaml",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.policy, Some(PathBuf::from("gov.yaml")));
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("events.jsonl")));
                assert!(args.flush);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ledger_list_filters() {
        let cli = Cli::try_parse_from([
            "boardroom",
            "ledger",
            "list",
            "--topic",
            "EU",
            "--outcome",
            "escalate",
            "--after",
            "2026-03-01",
            "--last",
            "5",
        ])
        .unwrap();

        let Some(Command::Ledger(LedgerCommand::List(args))) = cli.command else {
            panic!("expected ledger list");
        };
        assert_eq!(args.outcome, Some(Outcome::Escalate));
        assert_eq!(
            args.after,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
        );

        let query = args.to_query();
        assert_eq!(query.topic.as_deref(), Some("EU"));
        assert_eq!(query.last, Some(5));
        assert!(query.role.is_none());
    }

    #[test]
    fn test_invalid_outcome_is_rejected() {
        let result = Cli::try_parse_from(["boardroom", "ledger", "list", "--outcome", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_instant_formats() {
        assert_eq!(
            parse_instant("2026-03-01T12:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
        );
        assert!(parse_instant("last tuesday").is_err());
    }

    #[test]
    fn test_parse_policy_check_json() {
        let cli = Cli::try_parse_from(["boardroom", "policy", "check", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Policy(PolicyCommand::Check { json: true }))
        ));

        let cli = Cli::try_parse_from(["boardroom", "policy", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Policy(PolicyCommand::Check { json: false }))
        ));
    }

    #[test]
    fn test_empty_list_args_is_unfiltered() {
        assert!(ListArgs::default().to_query().is_unfiltered());
    }
}
