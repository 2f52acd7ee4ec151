//! # nearby-core: Pure View-State Logic for Nearby
//!
//! This crate holds everything the Nearby screens decide without touching
//! the network: wire types, validation, the error taxonomy, the alert
//! catalog and the two screen state machines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nearby Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (map, list, camera)                │   │
//! │  │     Categories ──► Map markers ──► Market detail ──► QR scan    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Presenter / DeviceCapabilities         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               nearby-client (flows + HTTP API)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nearby-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discovery │  │  detail   │  │   guard   │  │   │
//! │  │   │ Category  │  │ selection │  │  coupon   │  │ ScanGuard │  │   │
//! │  │   │  Market   │  │  markets  │  │  camera   │  │ sequence  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE STATE TRANSITIONS     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Category, MarketSummary, MarketDetail, CouponCode)
//! - [`discovery`] - Home screen state (categories → selection → markets)
//! - [`detail`] - Detail screen state (record, camera, redemption)
//! - [`guard`] - Scan debounce guard
//! - [`sequence`] - Latest-request-wins tickets
//! - [`alert`] - Localized alert catalog
//! - [`route`] - Navigation targets
//! - [`error`] - Flow and validation errors
//! - [`validation`] - Identifier and coordinate rules
//!
//! ## Example Usage
//!
//! ```rust
//! use nearby_core::discovery::{DiscoveryState, SelectionChange, Applied};
//! use nearby_core::Category;
//!
//! let mut state = DiscoveryState::new();
//! let ticket = state.begin_categories();
//! let applied = state.apply_categories(ticket, vec![Category {
//!     id: "c1".into(),
//!     name: "Food".into(),
//!     icon_id: "1".into(),
//! }]);
//!
//! assert_eq!(applied, Applied::Fresh(SelectionChange::Changed("c1".into())));
//! assert_eq!(state.begin_markets("c1").map(|t| t.seq()), Some(1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alert;
pub mod detail;
pub mod discovery;
pub mod error;
pub mod guard;
pub mod route;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use alert::{Alert, Confirmation, Locale, Notice};
pub use error::{CoreResult, FlowError, ValidationError};
pub use route::Route;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Request timeout applied uniformly to every backend call.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 700;

/// Delay between the first admitted scan and the confirmation prompt.
pub const SCAN_CONFIRM_DELAY_MS: u64 = 500;

/// Longest identifier accepted in a path segment.
pub const MAX_ID_LEN: usize = 128;

/// Where the map opens when the user's position is not used.
pub const DEFAULT_MAP_CENTER: Coordinates =
    Coordinates::new(-23.561187293883442, -46.656451388116494);

/// Latitude/longitude span of the initial map region.
pub const DEFAULT_MAP_DELTA: f64 = 0.01;
