//! policy-tracker — record and query policy changes
//!
//! # Usage
//!
//! ```bash
//! # Create the schema and load sample rows
//! policy-tracker init
//! policy-tracker seed
//!
//! # Filtered listing
//! policy-tracker list --category Compliance --since 2026-01-01
//!
//! # Show the SQL without connecting
//! policy-tracker --dry-run report --by impact
//! ```

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use colored::*;
use tracing_subscriber::EnvFilter;

use policy_tracker::cli::Cli;
use policy_tracker::commands;
use policy_tracker::config::TrackerConfig;
use policy_tracker::engine::PolicyDb;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = TrackerConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log_level.as_deref());

    let plan = commands::plan(&cli.command)?;

    if cli.dry_run {
        println!("{}", "Generated SQL:".green().bold());
        println!("{}", plan.sql());
        return Ok(());
    }

    let target = config.resolve_target(cli.database_url.as_deref());
    let mut db = PolicyDb::connect(&target).await?;

    // Close the session whether or not the command succeeded.
    let outcome = commands::run(&plan, &mut db, cli.format).await;
    let closed = db.close().await;
    outcome?;
    closed?;
    Ok(())
}

fn init_tracing(verbose: bool, config_level: Option<&str>) {
    let fallback = if verbose {
        "debug"
    } else {
        config_level.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
