//! App Store metadata sync for a device-management server
//!
//! Lists the mobile device apps the server manages, looks each one up in the
//! public store and pushes name, version and description back when the
//! versions differ.

// appinfosync/src/main.rs
mod catalog;
mod config;
mod errors;
mod store;
mod sync;
mod utils;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use config::{Cli, SyncConfig, TerminalPrompt};
use errors::AppError;
use std::process::ExitCode;
use sync::SyncReport;
use tracing_subscriber::EnvFilter;

/// Main entry point for the sync tool
#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return parse_failure_exit_code(&e);
        }
    };

    finish(run_app(cli).await)
}

/// `--help` and `--version` are not failures; every other parse error is.
fn parse_failure_exit_code(e: &clap::Error) -> ExitCode {
    if e.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Logs the outcome of a run and maps it to the process exit status.
fn finish(outcome: Result<SyncReport>) -> ExitCode {
    match outcome {
        Ok(report) => {
            tracing::info!("✅ Sync completed: {}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("❌ Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Usage text to show before failing, for configuration errors only.
fn usage_for(e: &AppError) -> Option<String> {
    match e {
        AppError::Config(_) => Some(Cli::command().render_help().to_string()),
        _ => None,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("appinfosync=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_app(cli: Cli) -> Result<SyncReport> {
    let config = match SyncConfig::resolve(cli, &mut TerminalPrompt) {
        Ok(config) => config,
        Err(e @ AppError::Config(_)) => {
            if let Some(usage) = usage_for(&e) {
                eprintln!("{}", usage);
            }
            return Err(e).context("Invalid configuration");
        }
        Err(e @ AppError::InvalidUrl(_)) => {
            return Err(e).context("Check the URL used and try again");
        }
        Err(e) => return Err(e).context("Failed to resolve configuration"),
    };
    tracing::debug!("Sync configuration: {:?}", config);

    sync::run_sync_flow(&config).await.map_err(|e| {
        let hint = match &e {
            AppError::Transport(_) => "Check the server URL used and try again",
            _ => "Sync process failed",
        };
        anyhow::Error::new(e).context(hint)
    })
}
