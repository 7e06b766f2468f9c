//! CLI entrypoint for Boardroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use boardroom_application::{
    DecisionIntegrator, IngestEvidenceUseCase, IngestOptions, IntegratorConfig, LedgerExplorer,
};
use boardroom_domain::{DecisionId, GovernancePolicy};
use boardroom_infrastructure::{ConfigLoader, FileConfig, JsonlDecisionLedger, PolicyLoader};
use boardroom_presentation::output::{self, ConsoleFormatter};
use boardroom_presentation::{
    Cli, Command, DecisionReporter, LedgerCommand, PolicyCommand, RunArgs,
};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_ref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.no_color || !config.output.color {
        output::disable_color();
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // === Dependency Injection ===
    let policy = load_policy(cli.policy.or_else(|| config.policy_path()))?;
    let ledger_path = cli
        .ledger
        .or_else(|| config.ledger_path())
        .unwrap_or_else(|| PathBuf::from(&policy.logging.ledger_path));
    info!("Using ledger {}", ledger_path.display());
    let ledger = Arc::new(JsonlDecisionLedger::new(ledger_path));

    match command {
        Command::Run(args) => run(args, policy, ledger, &config).await,
        Command::Ledger(command) => explore(command, ledger).await,
        Command::Policy(command) => inspect_policy(command, &policy),
    }
}

fn init_logging(verbose: u8, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "boardroom.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn load_policy(path: Option<PathBuf>) -> Result<GovernancePolicy> {
    match path {
        Some(path) => PolicyLoader::load(&path).map_err(|e| anyhow!("{}", e)),
        None => {
            info!("No policy file configured; using the default CONSENSUS policy");
            Ok(GovernancePolicy::default())
        }
    }
}

async fn run(
    args: RunArgs,
    policy: GovernancePolicy,
    ledger: Arc<JsonlDecisionLedger>,
    config: &FileConfig,
) -> Result<()> {
    let integrator_config: IntegratorConfig = config.integrator_config();
    let reporter =
        DecisionReporter::new(output::formatter(args.json)).with_quiet(args.quiet || args.json);
    let integrator = DecisionIntegrator::new(Arc::new(policy), Arc::clone(&ledger))
        .with_config(integrator_config)
        .with_notifier(Arc::new(reporter));

    info!(
        "Integrating evidence under {} policy",
        integrator.policy().mode.description()
    );

    let use_case = IngestEvidenceUseCase::new(&integrator);
    let options = IngestOptions {
        flush_at_end: args.flush,
    };
    let report = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Cannot open evidence file {}", path.display()))?;
            use_case.execute(BufReader::new(file), options).await?
        }
        None => {
            use_case
                .execute(BufReader::new(tokio::io::stdin()), options)
                .await?
        }
    };

    if integrator.unscoped_count() > 0 {
        info!(
            "{} messages had no topic and were not used",
            integrator.unscoped_count()
        );
    }
    eprint!("{}", ConsoleFormatter::run_report(&report));

    if let Some(first) = report.failures.first() {
        bail!(
            "{} decisions could not be recorded in {} (first: '{}')",
            report.failures.len(),
            ledger.path().display(),
            first.topic()
        );
    }
    Ok(())
}

async fn explore(command: LedgerCommand, ledger: Arc<JsonlDecisionLedger>) -> Result<()> {
    let explorer = LedgerExplorer::new(ledger);

    match command {
        LedgerCommand::List(args) => {
            let entries = explorer.query(&args.to_query()).await?;
            println!(
                "{}",
                output::formatter(args.json).format_entries(&entries).trim_end()
            );
        }
        LedgerCommand::Summary { json } => {
            let summary = explorer.summary().await?;
            println!("{}", output::formatter(json).format_summary(&summary).trim_end());
        }
        LedgerCommand::Show { id, json } => {
            let Some(entry) = explorer.find(&DecisionId::from(id.as_str())).await? else {
                bail!("No decision with id {}", id);
            };
            println!("{}", output::formatter(json).format_entry(&entry).trim_end());
        }
    }
    Ok(())
}

fn inspect_policy(command: PolicyCommand, policy: &GovernancePolicy) -> Result<()> {
    match command {
        PolicyCommand::Show => {
            println!("{}", serde_json::to_string_pretty(policy)?);
        }
        PolicyCommand::Check { json } => {
            let issues = policy.validate();
            println!("{}", output::formatter(json).format_issues(&issues).trim_end());
            if GovernancePolicy::has_errors(&issues) {
                bail!("Policy has errors");
            }
        }
    }
    Ok(())
}
