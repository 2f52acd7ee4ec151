//! # nearby-client: HTTP API and Screen Flows for Nearby
//!
//! This crate connects the pure state machines in `nearby-core` to the
//! backend and to whatever front-end draws the screens.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Client Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                ClientConfig (defaults → TOML → env)              │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ built once                              │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │        HttpMarketApi (reqwest, base URL, 700 ms, cookies)        │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ Arc<dyn MarketApi>                      │
//! │         ┌─────────────────────┴─────────────────────┐                  │
//! │         ▼                                           ▼                   │
//! │  ┌────────────────────────┐              ┌────────────────────────┐    │
//! │  │    MarketDiscovery     │              │    MarketDetailFlow    │    │
//! │  │                        │              │                        │    │
//! │  │ categories → selection │ open_market  │ detail → camera → scan │    │
//! │  │ → markets → markers    │ ───────────► │ → confirm → redeem     │    │
//! │  └───────────┬────────────┘              └───────────┬────────────┘    │
//! │              │                                       │                  │
//! │              └─────────── Presenter ─────────────────┘                  │
//! │                           DeviceCapabilities                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - `MarketApi` trait and its HTTP implementation
//! - [`config`] - Client configuration (base URL, timeout, locale, map)
//! - [`detail`] - Detail screen flow
//! - [`discovery`] - Home screen flow
//! - [`error`] - Client error types
//! - [`ui`] - Presenter and device capability seams
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nearby_client::{ClientConfig, HttpMarketApi, MarketDiscovery};
//!
//! let config = Arc::new(ClientConfig::load_or_default(None));
//! let api = Arc::new(HttpMarketApi::new(&config.api)?);
//!
//! let home = MarketDiscovery::new(api, presenter, device, config);
//! home.mount().await?;
//!
//! let view = home.snapshot().await;
//! println!("{} markets near you", view.markets.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod detail;
pub mod discovery;
pub mod error;
pub mod ui;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{HttpMarketApi, MarketApi};
pub use config::{ApiSettings, ClientConfig, MapSettings, UiSettings};
pub use detail::{MarketDetailFlow, ScanOutcome};
pub use discovery::MarketDiscovery;
pub use error::{ClientError, ClientResult};
pub use ui::{
    CapabilityError, DeviceCapabilities, NoDevice, NoOpPresenter, PermissionStatus, Presenter,
};
