//! tictactoe_ai - interactive tic-tac-toe against a learned predictor.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use tictactoe_ai::{
    AppConfig, Backend, Backends, PredictorProvider, Session, StdConsole, google_backends,
    memory_backends, render_leaderboard, sqlite_backends,
};
use tracing::{error, info, instrument, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(backend) = cli.backend {
        config = config.with_backend(backend);
    }
    init_tracing(cli.verbose, config.log_file())?;
    info!(backend = %config.backend(), "Starting tictactoe_ai");

    let backends = open_backends(&config)
        .await
        .inspect_err(|e| error!(error = %e, "Startup failed"))
        .context("Error loading game data")?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(config, backends).await,
        Command::Leaderboard => show_leaderboard(backends).await,
        Command::Train => train(config, backends).await,
    }
}

/// Logs go to a file so they do not interleave with the prompts.
fn init_tracing(verbose: bool, log_file: &Path) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,tictactoe_ai=info"));
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = std::fs::File::create(log_file)
            .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Arc::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

#[instrument(skip(config), fields(backend = %config.backend()))]
async fn open_backends(config: &AppConfig) -> Result<Backends> {
    let backends = match config.backend() {
        Backend::Google => google_backends(config.google().clone()).await?,
        Backend::Sqlite => sqlite_backends(config.sqlite())?,
        Backend::Memory => memory_backends(),
    };
    info!("Backends ready");
    Ok(backends)
}

async fn play(config: AppConfig, backends: Backends) -> Result<()> {
    let mut session = Session::new(StdConsole::new(), backends, config.training().clone())
        .with_retrain_on_exit(*config.retrain_on_exit());
    let report = session.run().await?;
    info!(
        rounds = report.rounds(),
        records = report.records().len(),
        persisted = report.persisted(),
        termination = ?report.termination(),
        "Session report"
    );
    Ok(())
}

async fn show_leaderboard(backends: Backends) -> Result<()> {
    let board = backends.leaderboard.read_leaderboard().await?;
    println!("{}", render_leaderboard(&board, None));
    Ok(())
}

async fn train(config: AppConfig, backends: Backends) -> Result<()> {
    let history = backends.history.read_history().await?;
    let provider = PredictorProvider::new(backends.predictors, config.training().clone());
    let Some(network) = provider.train(&history).await else {
        warn!("Nothing to train on");
        println!("No training data available.");
        return Ok(());
    };
    if !provider.persist(&network).await {
        anyhow::bail!("Trained predictor could not be persisted");
    }
    println!("Trained on {} records and saved the model.", history.len());
    Ok(())
}
