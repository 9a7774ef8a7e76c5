//! Klausul CLI entry point.

use anyhow::Result;
use clap::Parser;
use klausul::cli::{commands, Cli, Commands, Output};
use klausul::config::Settings;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            Output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("klausul={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Analyze {
            query,
            model,
            max_turns,
            json,
        } => {
            return commands::run_analyze(
                query.as_deref(),
                model.clone(),
                *max_turns,
                *json,
                settings,
            )
            .await;
        }

        Commands::Fetch {
            ticker,
            form,
            limit,
        } => {
            commands::run_fetch(ticker, form.clone(), *limit, settings).await?;
        }

        Commands::Schema => {
            commands::run_schema()?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
