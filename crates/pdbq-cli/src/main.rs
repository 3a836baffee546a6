//! pdbq CLI - Main entry point

use clap::Parser;
use pdbq_cli::{commands, Cli, Commands, RcsbConfig};
use pdbq_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Warnings only unless --verbose; PDBQ_LOG_* variables take precedence
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::default().with_level(level).with_output(LogOutput::Console);
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging; keep the guard alive for file output
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> pdbq_cli::Result<RcsbConfig> {
    let config = RcsbConfig::load(cli.config.as_deref())?;
    match &cli.base_url {
        Some(base) => config.with_base_url(base),
        None => Ok(config),
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> pdbq_cli::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Search {
            value,
            kind,
            comparator,
            format,
        } => commands::search::run(config, value, kind, comparator, format).await,

        Commands::Report { ids, fields, format } => commands::report::run(config, ids, fields, format).await,

        Commands::Describe { ids, format } => commands::describe::run(config, ids, format).await,

        Commands::Sequences { id, format } => commands::sequences::run(config, id, format).await,

        Commands::WebSearch {
            value,
            kind,
            comparator,
            timeout_ms,
            poll_ms,
        } => commands::web_search::run(config, value, kind, comparator, timeout_ms, poll_ms).await,
    }
}
