//! RTL CLI
//!
//! Command-line interface for browsing routes, buying tickets and watching
//! live vehicles approach a location.

#![allow(clippy::print_stdout)]

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, LoggingConfig, init_logging};
use secrecy::SecretString;

use crate::cli::{Cli, Commands, log_filter_from_verbosity};

/// Load configuration and apply command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    if let Some(email) = &cli.email {
        config.client.email = Some(email.clone());
    }
    if let Some(password) = &cli.password {
        config.client.password = Some(SecretString::from(password.clone()));
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Set up logging based on verbosity
    let logging = LoggingConfig {
        log_filter: log_filter_from_verbosity(cli.verbose)
            .map_or_else(|| config.logging.log_filter.clone(), str::to_string),
        json: config.logging.json,
    };
    init_logging(&logging)?;

    match cli.command {
        Commands::Routes { vehicle_type } => commands::routes(&config, vehicle_type).await,
        Commands::Products {
            route,
            vehicle_type,
        } => commands::products(&config, &route, vehicle_type).await,
        Commands::Live {
            route,
            vehicle_type,
        } => commands::live(&config, &route, vehicle_type).await,
        Commands::Book {
            route,
            product,
            count,
            card_id,
            vehicle_type,
        } => {
            commands::book(
                &config,
                &commands::BookRequest {
                    route,
                    product,
                    count,
                    card_id,
                    vehicle_type,
                },
            )
            .await
        },
        Commands::Watch {
            lat,
            lon,
            routes,
            threshold_km,
            vehicles,
            vehicle_type,
        } => {
            commands::watch(
                &config,
                commands::WatchRequest {
                    latitude: lat,
                    longitude: lon,
                    routes,
                    threshold_km,
                    vehicles,
                    vehicle_type,
                },
            )
            .await
        },
    }
}
