//! CPT ingester.
//!
//! Reads GEF files, extracts their metadata and stores it with the raw
//! files in PostgreSQL under an owner.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use storage::ConnectionParams;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cpt_ingester::commands;
use cpt_ingester::{BatchSummary, Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for JSON output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .json()
        .init();

    let params = ConnectionParams::from(&cli.db);
    let mut stdout = io::stdout().lock();

    let summary = match &cli.command {
        Command::Init => {
            let mut store = commands::connect(&params).await?;
            commands::init(&store).await?;
            store.disconnect().await;
            None
        }
        Command::Inspect { files } => Some(commands::inspect(files, &mut stdout)?),
        Command::Ingest { owner, files } => {
            let mut store = commands::connect(&params).await?;
            commands::init(&store).await?;
            let summary = commands::ingest(&store, owner, files).await?;
            store.disconnect().await;
            Some(summary)
        }
        Command::List { owner } => {
            let mut store = commands::connect(&params).await?;
            let count = commands::list(&store, owner, &mut stdout).await?;
            info!(owner = %owner, count, "Listed CPTs");
            store.disconnect().await;
            None
        }
    };
    stdout.flush()?;

    Ok(exit_code(summary))
}

fn exit_code(summary: Option<BatchSummary>) -> ExitCode {
    match summary {
        Some(summary) if !summary.is_success() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
