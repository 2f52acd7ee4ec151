//! # Front-End Seams
//!
//! What the flows need from whoever draws the screens: alerts, prompts,
//! navigation, and the device's camera and location permissions.
//!
//! ```text
//! ┌──────────────────┐   alert / confirm / navigate   ┌────────────────────┐
//! │ MarketDiscovery  │ ─────────────────────────────► │ Presenter          │
//! │ MarketDetailFlow │                                │ (terminal, mobile) │
//! │                  │   permission / position        ├────────────────────┤
//! │                  │ ─────────────────────────────► │ DeviceCapabilities │
//! └──────────────────┘                                └────────────────────┘
//! ```

use async_trait::async_trait;
use nearby_core::{Alert, Capability, Confirmation, Coordinates, Route};
use thiserror::Error;

// =============================================================================
// Presenter
// =============================================================================

/// Presentation layer driven by the flows.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Shows a blocking alert; resolves once the user dismisses it.
    async fn alert(&self, alert: &Alert);

    /// Shows a two-button prompt; true when the confirm action was chosen.
    async fn confirm(&self, confirmation: &Confirmation) -> bool;

    /// Switches to another screen.
    fn navigate(&self, route: &Route);
}

/// Presenter that shows nothing and declines every prompt.
pub struct NoOpPresenter;

#[async_trait]
impl Presenter for NoOpPresenter {
    async fn alert(&self, _alert: &Alert) {}

    async fn confirm(&self, _confirmation: &Confirmation) -> bool {
        false
    }

    fn navigate(&self, _route: &Route) {}
}

// =============================================================================
// Device Capabilities
// =============================================================================

/// Answer to a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// The capability exists but could not be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CapabilityError(pub String);

/// Camera and location access on the host device.
#[async_trait]
pub trait DeviceCapabilities: Send + Sync {
    /// Asks the user for a permission (foreground only).
    async fn request_permission(
        &self,
        capability: Capability,
    ) -> Result<PermissionStatus, CapabilityError>;

    /// Reads the current position. Only called after location is granted.
    async fn current_position(&self) -> Result<Coordinates, CapabilityError>;
}

/// Device with no camera or location: every request is denied.
pub struct NoDevice;

#[async_trait]
impl DeviceCapabilities for NoDevice {
    async fn request_permission(
        &self,
        _capability: Capability,
    ) -> Result<PermissionStatus, CapabilityError> {
        Ok(PermissionStatus::Denied)
    }

    async fn current_position(&self) -> Result<Coordinates, CapabilityError> {
        Err(CapabilityError("no location provider".to_string()))
    }
}
