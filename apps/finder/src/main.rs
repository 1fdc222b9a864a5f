use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{Orchestrator, PredictionClient, StaticInput};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::load_settings;
use terminal::{OutputFormat, TerminalSurface};

/// Look up a likely condition for a set of symptoms and nearby specialists.
#[derive(Parser, Debug)]
#[command(name = "finder", version)]
struct Args {
    /// Config file; defaults to ./finder.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Repeat or comma-separate to select several symptoms.
    #[arg(short, long = "symptom", value_delimiter = ',')]
    symptoms: Vec<String>,
    /// City, zip code, or address.
    #[arg(short, long, default_value = "")]
    location: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    for warning in &settings.warnings {
        tracing::warn!("{warning}");
    }

    let client_settings = settings.client_settings();
    let client = PredictionClient::new(&client_settings)
        .with_context(|| format!("invalid prediction service url '{}'", settings.server_url))?;
    tracing::info!(endpoint = %client.predict_url(), "prediction service configured");

    let orchestrator = Orchestrator::with_timeout(
        Arc::new(client),
        Arc::new(TerminalSurface::stdio(args.format)),
        client_settings.request_timeout,
    );
    let input = StaticInput::new(args.symptoms, args.location);
    let outcome = orchestrator.handle_submit(&input).await;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
