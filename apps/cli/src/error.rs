//! # CLI Error Type
//!
//! What a failed command reports, both as text and as `--json` output.
//!
//! ```text
//! FlowError / ClientError ──► CliError { code, message } ──► stderr + exit code
//! ```
//!
//! The user already saw the localized alert through the presenter; this is
//! the machine-readable tail for scripts.

use nearby_client::ClientError;
use nearby_core::{FlowError, ValidationError};
use serde::Serialize;
use std::process::ExitCode;

/// Error returned from a command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NETWORK_ERROR",
///   "message": "Failed to load categories: Request timed out after 700 ms"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes, one per exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad argument or identifier
    ValidationError,

    /// Backend unreachable, slow or rejecting
    NetworkError,

    /// Market does not exist
    NotFound,

    /// Camera or location refused or unusable
    PermissionDenied,

    /// Config file or URL problem
    ConfigError,

    /// The user answered "no"
    Declined,

    /// Output or task failure inside the CLI
    Internal,
}

impl ErrorCode {
    /// Process exit status (sysexits-style).
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::ValidationError => 64,
            ErrorCode::NotFound => 66,
            ErrorCode::PermissionDenied => 77,
            ErrorCode::NetworkError => 69,
            ErrorCode::ConfigError => 78,
            ErrorCode::Declined => 1,
            ErrorCode::Internal => 70,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(market_id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("Market not found: {}", market_id))
    }

    pub fn declined() -> Self {
        CliError::new(ErrorCode::Declined, "Redemption cancelled")
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<FlowError> for CliError {
    fn from(err: FlowError) -> Self {
        let code = match &err {
            FlowError::CategoryFetchFailed(_)
            | FlowError::MarketFetchFailed { .. }
            | FlowError::MarketDetailFetchFailed { .. }
            | FlowError::CouponRedemptionFailed { .. } => ErrorCode::NetworkError,
            FlowError::PermissionDenied { .. } | FlowError::CapabilityUnavailable { .. } => {
                ErrorCode::PermissionDenied
            }
            FlowError::Validation(_) => ErrorCode::ValidationError,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let code = if err.is_config_error() {
            ErrorCode::ConfigError
        } else if matches!(err, ClientError::Validation(_)) {
            ErrorCode::ValidationError
        } else {
            ErrorCode::NetworkError
        };
        CliError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearby_core::Capability;

    #[test]
    fn test_flow_error_codes() {
        let err: CliError = FlowError::CategoryFetchFailed("timeout".into()).into();
        assert_eq!(err.code, ErrorCode::NetworkError);

        let err: CliError = FlowError::PermissionDenied {
            capability: Capability::Camera,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.code.exit_status(), 77);
    }

    #[test]
    fn test_client_error_codes() {
        let err: CliError = ClientError::InvalidUrl("x".into()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err: CliError = ClientError::Timeout(700).into();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(CliError::not_found("m9")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Market not found: m9");
    }
}
