//! # Nearby CLI
//!
//! Terminal front-end for the Nearby screens.
//!
//! ## Module Organization
//! ```text
//! nearby_cli/
//! ├── lib.rs          ◄─── You are here (arguments, logging, run)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Context and dispatch
//! │   ├── categories.rs
//! │   ├── markets.rs  ◄─── Home screen: selection, markets, map pins
//! │   ├── market.rs   ◄─── Detail screen
//! │   ├── redeem.rs   ◄─── Scan / confirm / redeem
//! │   └── config.rs   ◄─── Show or write client.toml
//! ├── terminal.rs     ◄─── Presenter + DeviceCapabilities for a terminal
//! └── error.rs        ◄─── CliError with exit codes
//! ```
//!
//! ## Examples
//! ```text
//! nearby markets                          # first category, like the home screen
//! nearby markets --category c2 --at -23.56,-46.65
//! nearby market m1 --json
//! nearby redeem m1 --scan m1 --scan m1    # duplicate scans are ignored
//! nearby config init
//! ```

pub mod commands;
pub mod error;
pub mod terminal;

use clap::{Parser, Subcommand};
use nearby_core::{Coordinates, Locale};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use error::CliError;

// =============================================================================
// Arguments
// =============================================================================

/// Find markets near you and redeem their coupons.
#[derive(Parser, Debug)]
#[command(name = "nearby", version)]
pub struct Cli {
    /// Config file (default: <config dir>/nearby/client.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL; overrides the config file and NEARBY_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Alert language: pt-BR or en
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Print results (and errors) as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List categories
    Categories,

    /// List the markets of a category (default: the first one)
    Markets {
        /// Category id to select
        #[arg(short, long)]
        category: Option<String>,

        /// Your position, LAT,LON
        #[arg(long, value_parser = terminal::parse_coordinates, allow_hyphen_values = true)]
        at: Option<Coordinates>,
    },

    /// Show one market
    Market {
        /// Market id
        id: String,
    },

    /// Redeem a coupon at a market
    Redeem {
        /// Market id
        id: String,

        /// Decoded QR value; repeat to simulate a camera stream
        #[arg(long = "scan")]
        scans: Vec<String>,

        /// Answer the confirmation prompt with yes
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or write the client config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective config
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, runs the command and maps the outcome to an exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    match commands::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, json);
            err.exit_code()
        }
    }
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(line) => println!("{}", line),
            Err(_) => eprintln!("error: {}", err),
        }
    } else {
        eprintln!("error: {}", err);
    }
}

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "warn,nearby=info";

/// Initializes the tracing subscriber (stderr, `RUST_LOG` aware).
fn init_tracing() {
    log_subscriber(log_filter()).init();
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}
