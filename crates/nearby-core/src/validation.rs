//! # Validation Module
//!
//! Input validation for identifiers, scanned payloads and coordinates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                 │
//! │  └── Taps, scans and route params arrive as raw strings                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Identifier rules (non-empty, bounded, no control chars)           │
//! │  └── Coordinate ranges                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: HTTP client                                                  │
//! │  └── Path segments percent-encoded before the request goes out         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nearby_core::validation::{validate_category_id, validate_scan_payload};
//!
//! assert!(validate_category_id("c1").is_ok());
//! assert_eq!(validate_scan_payload("  m1 \n").unwrap(), "m1");
//! ```

use crate::error::ValidationError;
use crate::types::Coordinates;
use crate::MAX_ID_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    if id.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a category identifier.
///
/// ## Example
/// ```rust
/// use nearby_core::validation::validate_category_id;
///
/// assert!(validate_category_id("c1").is_ok());
/// assert!(validate_category_id("").is_err());
/// ```
pub fn validate_category_id(id: &str) -> ValidationResult<()> {
    validate_id("category id", id)
}

/// Validates a market identifier.
pub fn validate_market_id(id: &str) -> ValidationResult<()> {
    validate_id("market id", id)
}

/// Validates a decoded QR payload and returns it trimmed.
///
/// Scanners frequently append a newline; surrounding whitespace is not part
/// of the payload.
pub fn validate_scan_payload(value: &str) -> ValidationResult<String> {
    validate_id("scanned code", value)?;
    Ok(value.trim().to_string())
}

// =============================================================================
// Coordinate Validators
// =============================================================================

/// Validates a latitude/longitude pair.
///
/// ## Rules
/// - Latitude in [-90, 90]
/// - Longitude in [-180, 180]
/// - Neither may be NaN
pub fn validate_coordinates(coordinates: &Coordinates) -> ValidationResult<()> {
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err(ValidationError::OutOfRange {
            field: "latitude".to_string(),
            min: -90.0,
            max: 90.0,
        });
    }

    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err(ValidationError::OutOfRange {
            field: "longitude".to_string(),
            min: -180.0,
            max: 180.0,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
