//! # Error Types
//!
//! Domain-specific error types for nearby-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nearby-core errors (this file)                                        │
//! │  ├── FlowError        - What a screen flow reports                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nearby-client errors (separate crate)                                 │
//! │  └── ClientError      - HTTP / config failures (the logged cause)      │
//! │                                                                         │
//! │  Flow: ClientError ──► FlowError ──► Alert (title + message) ──► User  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (market ID, category ID)
//! 3. Every `FlowError` maps to exactly one user-facing [`Alert`]
//! 4. The underlying cause is logged, never shown

use thiserror::Error;

use crate::alert::{Alert, Locale, Notice};
use crate::route::Route;
use crate::types::Capability;

// =============================================================================
// Flow Error
// =============================================================================

/// Failures a screen flow can surface.
///
/// All of them are scoped to the screen that raised them and none are retried
/// automatically: the user re-triggers the originating action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowError {
    /// The category list could not be fetched.
    #[error("Failed to load categories: {0}")]
    CategoryFetchFailed(String),

    /// The market list for a category could not be fetched.
    #[error("Failed to load markets for category {category_id}: {reason}")]
    MarketFetchFailed { category_id: String, reason: String },

    /// The detail record for a market could not be fetched.
    ///
    /// ## User Workflow
    /// ```text
    /// Open /market/m1
    ///      │
    ///      ▼
    /// GET /markets/m1 fails
    ///      │
    ///      ▼
    /// Alert "Erro" ── OK ──► back to /home
    /// ```
    #[error("Failed to load market {market_id}: {reason}")]
    MarketDetailFetchFailed { market_id: String, reason: String },

    /// The coupon redemption call failed.
    #[error("Failed to redeem coupon for market {market_id}: {reason}")]
    CouponRedemptionFailed { market_id: String, reason: String },

    /// The user refused a device permission.
    #[error("Permission denied: {capability}")]
    PermissionDenied { capability: Capability },

    /// The capability exists but could not be used.
    #[error("{capability} unavailable: {reason}")]
    CapabilityUnavailable {
        capability: Capability,
        reason: String,
    },

    /// Input validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl FlowError {
    /// Returns the alert shown for this failure.
    pub fn alert(&self, locale: Locale) -> Alert {
        self.notice().render(locale)
    }

    /// Returns the notice this failure maps to.
    pub fn notice(&self) -> Notice {
        match self {
            FlowError::CategoryFetchFailed(_) => Notice::CategoriesFailed,
            FlowError::MarketFetchFailed { .. } => Notice::MarketsFailed,
            FlowError::MarketDetailFetchFailed { .. } => Notice::DetailFailed,
            FlowError::CouponRedemptionFailed { .. } => Notice::CouponFailed,
            FlowError::PermissionDenied {
                capability: Capability::Camera,
            } => Notice::CameraDenied,
            FlowError::PermissionDenied {
                capability: Capability::Location,
            } => Notice::LocationDenied,
            FlowError::CapabilityUnavailable {
                capability: Capability::Camera,
                ..
            } => Notice::CameraFailed,
            FlowError::CapabilityUnavailable {
                capability: Capability::Location,
                ..
            } => Notice::LocationFailed,
            FlowError::Validation(_) => Notice::InvalidInput,
        }
    }

    /// Route the user is sent to once the alert is acknowledged.
    ///
    /// Only a failed detail fetch has a navigational consequence.
    pub fn fallback_route(&self) -> Option<Route> {
        match self {
            FlowError::MarketDetailFetchFailed { .. } => Some(Route::Home),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any request is issued, so a bad identifier never reaches
/// the backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., control characters in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with FlowError.
pub type CoreResult<T> = Result<T, FlowError>;

// =============================================================================
// Unit Tests
// =============================================================================
