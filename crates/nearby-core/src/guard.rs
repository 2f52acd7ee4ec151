//! # Scan Guard
//!
//! Single-slot debounce for the camera's decoded-value stream.
//!
//! ## Why A Guard?
//! A physical QR scan yields the same decoded value several times in quick
//! succession. Only the first one may start a redemption.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ScanGuard States                                │
//! │                                                                         │
//! │        camera (re)opened                                                │
//! │   ┌──────────────────────────┐                                          │
//! │   │                          │                                          │
//! │   ▼         accept(v)        │                                          │
//! │ ┌──────┐ ─────────────────► ┌────────┐  accept(v') ──► discarded        │
//! │ │ Open │   returns Some(v)  │ Locked │                                  │
//! │ └──────┘                    └────────┘                                  │
//! │                                                                         │
//! │  Only reopen() leaves Locked. Nothing times out.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::validation::validate_scan_payload;

/// Guard state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanGuard {
    /// Waiting for the first value of this session.
    #[default]
    Open,
    /// A value was admitted; everything else is dropped.
    Locked {
        /// The admitted value.
        accepted: String,
    },
}

impl ScanGuard {
    /// Creates an open guard.
    pub fn new() -> Self {
        ScanGuard::Open
    }

    /// Offers a decoded value.
    ///
    /// Returns the trimmed value when it is the first non-empty value since
    /// the guard was (re)opened. Empty payloads leave the guard open.
    pub fn accept(&mut self, value: &str) -> Option<String> {
        match self {
            ScanGuard::Open => {
                let payload = validate_scan_payload(value).ok()?;
                *self = ScanGuard::Locked {
                    accepted: payload.clone(),
                };
                Some(payload)
            }
            ScanGuard::Locked { .. } => None,
        }
    }

    /// Starts a new scan session.
    pub fn reopen(&mut self) {
        *self = ScanGuard::Open;
    }

    /// Returns true once a value has been admitted.
    pub fn is_locked(&self) -> bool {
        matches!(self, ScanGuard::Locked { .. })
    }
}
