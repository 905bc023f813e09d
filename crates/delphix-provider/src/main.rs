// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! delphix-env - manage one Delphix environment from a JSON declaration.
//!
//! Engine connection settings are read from the environment (or a `.env`
//! file): `DELPHIX_URL`, `DELPHIX_USERNAME`, `DELPHIX_PASSWORD`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use delphix_provider::{EnvironmentConfig, EnvironmentController, ResourceState, plan};
use delphix_sdk::DelphixClient;

#[derive(Debug, Parser)]
#[command(name = "delphix-env", version, about = "Manage a Delphix environment")]
struct Cli {
    /// Declared environment configuration (JSON).
    #[arg(
        long,
        short,
        global = true,
        env = "DELPHIX_ENV_CONFIG",
        default_value = "environment.json"
    )]
    config: PathBuf,

    /// State file.
    #[arg(
        long,
        short,
        global = true,
        env = "DELPHIX_ENV_STATE",
        default_value = "environment.state.json"
    )]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show what apply would do.
    Plan,
    /// Create, update or replace the environment to match the configuration.
    Apply,
    /// Re-read the environment from the engine into state.
    Refresh,
    /// Delete the environment.
    Destroy,
    /// Print the current state.
    Show,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delphix_provider=info,delphix_sdk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut state = ResourceState::load(&cli.state)
        .with_context(|| format!("loading state from {}", cli.state.display()))?;

    if let Command::Show = cli.command {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let client = DelphixClient::from_env().context("loading engine configuration")?;
    client.connect().context("logging in to the engine")?;
    let result = reconcile(&cli, &client, state);
    client.close();
    result
}

fn reconcile(cli: &Cli, client: &DelphixClient, mut state: ResourceState) -> anyhow::Result<()> {
    let controller = EnvironmentController::new(client);

    controller
        .refresh(&mut state)
        .context("refreshing environment state")?;

    let desired = match cli.command {
        Command::Refresh => {
            state.save(&cli.state)?;
            println!("State refreshed");
            return Ok(());
        }
        Command::Destroy => None,
        _ => Some(
            EnvironmentConfig::from_file(&cli.config)
                .with_context(|| format!("loading configuration from {}", cli.config.display()))?,
        ),
    };

    let plan = plan(&state, desired.as_ref());
    println!("Plan: {}", plan);
    if matches!(cli.command, Command::Plan) || plan.is_noop() {
        return Ok(());
    }

    // State is saved even on failure: a replace may have deleted the old
    // environment before the create failed.
    let result = controller.apply(&plan, desired.as_ref(), &mut state);
    state
        .save(&cli.state)
        .with_context(|| format!("saving state to {}", cli.state.display()))?;
    result.context("applying plan")?;

    match state.id() {
        Some(reference) => println!("Environment {} ({})", state.name, reference),
        None => println!("Environment destroyed"),
    }
    Ok(())
}
