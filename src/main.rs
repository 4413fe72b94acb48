// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! ene-copilot - Entrepreneurship Copilot
//!
//! Multi-agent business planning for startup ideas.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ene_copilot::cli::run::RunInputs;
use ene_copilot::cli::{Cli, Commands};
use ene_copilot::CopilotError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Env fallbacks are resolved while parsing, so parse again once .env is in place
    let dotenv = dotenvy::dotenv();
    let cli = if dotenv.is_ok() { Cli::parse() } else { cli };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ene_copilot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    if !ene_copilot::utils::should_use_colors() {
        colored::control::set_override(false);
    }

    let result = dispatch(cli).await;

    if let Err(ref report) = result {
        if let Some(suggestion) = report
            .downcast_ref::<CopilotError>()
            .and_then(CopilotError::recovery)
        {
            eprintln!("{}", suggestion);
        }
    }

    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    let settings = cli.settings.into_settings()?;
    tracing::debug!(?settings, "Resolved settings");

    match cli.command {
        Commands::Serve { bind } => ene_copilot::cli::serve::run(settings, bind, verbose).await,
        Commands::Run {
            startup_idea,
            target_market,
            team_composition,
            sample,
            output_dir,
            no_input,
        } => {
            let inputs = RunInputs {
                startup_idea,
                target_market,
                team_composition,
                sample,
            };
            ene_copilot::cli::run::run(inputs, settings, output_dir, no_input, verbose).await
        }
        Commands::Check => ene_copilot::cli::check::run(settings, verbose).await,
        Commands::Graph { format } => ene_copilot::cli::graph::run(settings, format, verbose).await,
        Commands::Init { dir, force } => ene_copilot::cli::init::run(dir, force, verbose).await,
    }
}
