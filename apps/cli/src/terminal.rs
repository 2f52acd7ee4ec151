//! # Terminal Front-End
//!
//! `Presenter` and `DeviceCapabilities` for a plain terminal: alerts go to
//! stderr, prompts read a line from stdin, the "camera" is whatever was
//! passed with `--scan` and the position whatever was passed with `--at`.

use async_trait::async_trait;
use nearby_client::{CapabilityError, DeviceCapabilities, PermissionStatus, Presenter};
use nearby_core::validation::validate_coordinates;
use nearby_core::{Alert, Capability, Confirmation, Coordinates, Route};
use std::io::{BufRead, Write};
use tracing::{debug, info};

// =============================================================================
// Presenter
// =============================================================================

pub struct TerminalPresenter {
    /// Answer every prompt with the confirm action.
    assume_yes: bool,
}

impl TerminalPresenter {
    pub fn new(assume_yes: bool) -> Self {
        TerminalPresenter { assume_yes }
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn alert(&self, alert: &Alert) {
        eprintln!("[{}] {}", alert.title, alert.message);
    }

    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        eprintln!("[{}] {}", confirmation.title, confirmation.message);

        if self.assume_yes {
            eprintln!("{}", confirmation.confirm_label);
            return true;
        }

        let question = format!(
            "{} / {}: ",
            confirmation.confirm_label, confirmation.cancel_label
        );
        let confirm_label = confirmation.confirm_label.clone();

        let answer = tokio::task::spawn_blocking(move || {
            eprint!("{}", question);
            let _ = std::io::stderr().flush();
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line, &confirm_label),
            _ => false,
        }
    }

    fn navigate(&self, route: &Route) {
        info!(route = %route, "Navigate");
        eprintln!("→ {}", route);
    }
}

/// True for the confirm label itself, or y / yes / s / sim.
fn is_affirmative(answer: &str, confirm_label: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == confirm_label.to_lowercase() || matches!(answer.as_str(), "y" | "yes" | "s" | "sim")
}

// =============================================================================
// Device
// =============================================================================

pub struct TerminalDevice {
    camera: bool,
    position: Option<Coordinates>,
}

impl TerminalDevice {
    /// `camera`: whether scans were supplied. `position`: from `--at`.
    pub fn new(camera: bool, position: Option<Coordinates>) -> Self {
        TerminalDevice { camera, position }
    }
}

#[async_trait]
impl DeviceCapabilities for TerminalDevice {
    async fn request_permission(
        &self,
        capability: Capability,
    ) -> Result<PermissionStatus, CapabilityError> {
        let granted = match capability {
            Capability::Camera => self.camera,
            Capability::Location => self.position.is_some(),
        };
        debug!(%capability, granted, "Permission requested");

        Ok(if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    async fn current_position(&self) -> Result<Coordinates, CapabilityError> {
        self.position
            .ok_or_else(|| CapabilityError("no position given (use --at LAT,LON)".to_string()))
    }
}

/// Parses `LAT,LON` for `--at`.
pub fn parse_coordinates(value: &str) -> Result<Coordinates, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{}'", value))?;

    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("latitude: {}", e))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("longitude: {}", e))?;

    let coordinates = Coordinates::new(latitude, longitude);
    validate_coordinates(&coordinates).map_err(|e| e.to_string())?;
    Ok(coordinates)
}
