//! Command-line definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::VehicleType;

/// RTL CLI
#[derive(Debug, Parser)]
#[command(name = "rtl-cli")]
#[command(author, version, about = "RTL (Maldives) booking client and vehicle proximity monitor", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to rtl.toml in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Account email (overrides configuration)
    #[arg(long, env = "RTL_EMAIL", global = true)]
    pub email: Option<String>,

    /// Account password (overrides configuration)
    #[arg(long, env = "RTL_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List routes
    Routes {
        /// Vehicle type: bus or vessel
        #[arg(short = 't', long = "type", default_value = "bus")]
        vehicle_type: VehicleType,
    },

    /// List ticket products for a route
    Products {
        /// Route code
        route: String,

        /// Vehicle type: bus or vessel
        #[arg(short = 't', long = "type", default_value = "bus")]
        vehicle_type: VehicleType,
    },

    /// Show live vehicle positions on a route
    Live {
        /// Route code
        route: String,

        /// Vehicle type: bus or vessel
        #[arg(short = 't', long = "type", default_value = "bus")]
        vehicle_type: VehicleType,
    },

    /// Book and pay for tickets
    ///
    /// Example: rtl-cli book F1 SINGLE --type vessel
    Book {
        /// Route code
        route: String,

        /// Product code (see `products`)
        product: String,

        /// Number of tickets
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// Saved card to pay with (defaults to the first saved card)
        #[arg(long)]
        card_id: Option<i64>,

        /// Vehicle type: bus or vessel
        #[arg(short = 't', long = "type", default_value = "vessel")]
        vehicle_type: VehicleType,
    },

    /// Watch routes and report vehicles near a location until Ctrl-C
    ///
    /// Example: rtl-cli watch --lat 4.1755 --lon 73.5093 --route M1 --threshold-km 0.2
    Watch {
        /// Anchor latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Anchor longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Route code to poll (repeatable)
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,

        /// Distance threshold in km (defaults to the configured threshold)
        #[arg(long)]
        threshold_km: Option<f64>,

        /// Only report these vehicle ids (repeatable)
        #[arg(long = "vehicle")]
        vehicles: Vec<String>,

        /// Vehicle type: bus or vessel
        #[arg(short = 't', long = "type", default_value = "bus")]
        vehicle_type: VehicleType,
    },
}

/// Determine log filter level from verbosity count
///
/// `None` keeps the configured filter.
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
