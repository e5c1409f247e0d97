use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{Destination, HeaderId, Language, StatusCode};
use sop_router::{PolicyPreset, RoutedDocument, SopHeaderClient, StatusRouter, UrlNavigator};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

/// Decides which SOP page a document opens in, based on its workflow status.
#[derive(Parser, Debug)]
#[command(name = "qms-router", version)]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    app_base_url: Option<String>,
    #[arg(long)]
    language: Option<Language>,
    #[arg(long)]
    policy: Option<PolicyPreset>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a document's status and print where it should open.
    Route {
        #[arg(long)]
        header_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Classify a status code without contacting the backend.
    Classify { status: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    apply_cli_overrides(&mut settings, &cli);

    match cli.command {
        Command::Route { header_id, json } => {
            let router = build_router(&settings)?;
            let routed = router.route(&HeaderId::new(header_id)).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&routed)?);
            } else {
                print_routed(&routed);
            }
        }
        Command::Classify { status } => {
            println!("{}", classify_offline(&settings, &status)?);
        }
    }

    Ok(())
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.api_base_url {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = &cli.app_base_url {
        settings.app_base_url = v.clone();
    }
    if let Some(v) = cli.language {
        settings.language = v;
    }
    if let Some(v) = cli.policy {
        settings.policy = v;
    }
}

fn classify_offline(settings: &Settings, status: &str) -> Result<Destination> {
    let policy = settings.routing_policy()?;
    Ok(policy.classify(&StatusCode::normalized(status)))
}

fn build_router(settings: &Settings) -> Result<StatusRouter> {
    let lookup = SopHeaderClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .context("failed to configure sop header lookup")?;
    let navigator = UrlNavigator::with_templates(&settings.app_base_url, settings.paths.clone())
        .context("failed to configure navigation")?;
    Ok(StatusRouter::new(Arc::new(lookup), Arc::new(navigator))
        .with_policy(settings.routing_policy()?)
        .with_language(settings.language))
}

fn print_routed(routed: &RoutedDocument) {
    let classification = &routed.classification;
    println!("destination: {}", classification.destination);
    if classification.success {
        println!(
            "status: {} ({})",
            classification.status_code, classification.status_label
        );
    } else {
        println!("status: {} (lookup failed)", classification.status_label);
    }
    println!("url: {}", routed.target.url);
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
