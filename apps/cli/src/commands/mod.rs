//! # Commands
//!
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (Context, dispatch)
//! ├── categories.rs  ◄─── GET /categories
//! ├── markets.rs     ◄─── Home screen flow
//! ├── market.rs      ◄─── Detail screen flow
//! ├── redeem.rs      ◄─── Coupon redemption
//! └── config.rs      ◄─── client.toml
//! ```
//!
//! Every command builds its screen flow from the same [`Context`]: one
//! loaded config and one HTTP client.

pub mod categories;
pub mod config;
pub mod market;
pub mod markets;
pub mod redeem;

use nearby_client::{ClientConfig, HttpMarketApi, MarketApi};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{CliError, ErrorCode};
use crate::{Cli, Command};

/// What every command shares.
pub struct Context {
    pub config: Arc<ClientConfig>,
    pub api: Arc<dyn MarketApi>,
    pub json: bool,
}

impl Context {
    /// Loads the config (file, env, then command-line overrides) and builds
    /// the HTTP client once.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = effective_config(cli)?;
        let api = HttpMarketApi::new(&config.api)?;
        Ok(Context {
            config: Arc::new(config),
            api: Arc::new(api),
            json: cli.json,
        })
    }
}

/// File and environment settings with `--api-url` / `--locale` on top,
/// validated once everything is applied.
pub fn effective_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::load_unvalidated(cli.config.clone())?;

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }
    config.validate()?;
    Ok(config)
}

/// Runs the parsed command.
pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    if let Command::Config { action } = &cli.command {
        return config::run(*action, &cli).await;
    }

    let ctx = Context::from_cli(&cli)?;
    match cli.command {
        Command::Categories => categories::run(&ctx).await,
        Command::Markets { category, at } => markets::run(&ctx, category, at).await,
        Command::Market { id } => market::run(&ctx, &id).await,
        Command::Redeem { id, scans, yes } => redeem::run(&ctx, &id, &scans, yes).await,
        Command::Config { .. } => Ok(()),
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(ErrorCode::Internal, e.to_string()))?;
    println!("{}", text);
    Ok(())
}
