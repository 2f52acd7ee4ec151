//! # Client Configuration
//!
//! Configuration for the HTTP client and the screen flows.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NEARBY_API_URL=http://192.168.15.198:3333                          │
//! │     NEARBY_API_TIMEOUT_MS=700                                          │
//! │     NEARBY_API_CREDENTIALS=true                                        │
//! │     NEARBY_LOCALE=pt-BR                                                │
//! │     NEARBY_SCAN_DELAY_MS=500                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/nearby/client.toml (Linux)                               │
//! │     ~/Library/Application Support/com.nearby.nearby/client.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     700 ms timeout, credentials on, pt-BR alerts                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "http://192.168.15.198:3333"
//! timeout_ms = 700
//! with_credentials = true
//!
//! [ui]
//! locale = "pt-BR"
//! scan_confirm_delay_ms = 500
//!
//! [map]
//! follow_user = false
//!
//! [map.initial_region]
//! latitudeDelta = 0.01
//! longitudeDelta = 0.01
//! center = { latitude = -23.561187293883442, longitude = -46.656451388116494 }
//! ```
//!
//! The loaded config is immutable for the life of the process; the HTTP
//! client is built from it once.

use nearby_core::validation::validate_coordinates;
use nearby_core::{Locale, MapRegion, DEFAULT_API_TIMEOUT_MS, SCAN_CONFIRM_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// How the client talks to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend origin every path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (milliseconds), applied uniformly.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Keep and send cookies across requests.
    #[serde(default = "default_true")]
    pub with_credentials: bool,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            with_credentials: true,
        }
    }
}

impl ApiSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses the base URL.
    pub fn base(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "API URL cannot be used as a base: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}

// =============================================================================
// UI Settings
// =============================================================================

/// Presentation-facing behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Language of alert text.
    #[serde(default)]
    pub locale: Locale,

    /// Delay between an admitted scan and the confirmation prompt
    /// (milliseconds).
    #[serde(default = "default_scan_delay")]
    pub scan_confirm_delay_ms: u64,
}

fn default_scan_delay() -> u64 {
    SCAN_CONFIRM_DELAY_MS
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            locale: Locale::default(),
            scan_confirm_delay_ms: default_scan_delay(),
        }
    }
}

impl UiSettings {
    pub fn scan_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.scan_confirm_delay_ms)
    }
}

// =============================================================================
// Map Settings
// =============================================================================

/// Map surface behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Region the map opens on.
    #[serde(default)]
    pub initial_region: MapRegion,

    /// Ask for the user's position when the home screen mounts.
    #[serde(default)]
    pub follow_user: bool,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiSettings,

    /// Alerts and scan timing.
    #[serde(default)]
    pub ui: UiSettings,

    /// Map surface.
    #[serde(default)]
    pub map: MapSettings,
}

impl ClientConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let config = Self::load_unvalidated(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Same sources as [`ClientConfig::load`] without the final
    /// `validate()`, for callers that layer their own overrides on top.
    pub fn load_unvalidated(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.api.base()?;

        if self.api.timeout_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_ms must be greater than 0".into(),
            ));
        }

        let region = &self.map.initial_region;
        validate_coordinates(&region.center)?;
        if !(region.latitude_delta > 0.0 && region.longitude_delta > 0.0) {
            return Err(ClientError::InvalidConfig(
                "map deltas must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("NEARBY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(ms) = parse_millis(&var, "NEARBY_API_TIMEOUT_MS") {
            self.api.timeout_ms = ms;
        }

        if let Some(credentials) = var("NEARBY_API_CREDENTIALS") {
            match credentials.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.api.with_credentials = true,
                "0" | "false" | "no" | "off" => self.api.with_credentials = false,
                _ => warn!(value = %credentials, "Unknown NEARBY_API_CREDENTIALS in environment"),
            }
        }

        if let Some(locale) = var("NEARBY_LOCALE") {
            match locale.parse::<Locale>() {
                Ok(parsed) => {
                    debug!(locale = %parsed, "Overriding locale from environment");
                    self.ui.locale = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring NEARBY_LOCALE"),
            }
        }

        if let Some(ms) = parse_millis(&var, "NEARBY_SCAN_DELAY_MS") {
            self.ui.scan_confirm_delay_ms = ms;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "nearby", "nearby")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn locale(&self) -> Locale {
        self.ui.locale
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }
}

/// Reads a millisecond count from the environment; junk is ignored with a
/// warning.
fn parse_millis(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let value = var(name)?;
    match value.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            warn!(variable = name, value = %value, error = %e, "Ignoring invalid environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.timeout_ms, 700);
        assert!(config.api.with_credentials);
        assert_eq!(config.ui.locale, Locale::PtBr);
        assert_eq!(config.ui.scan_confirm_delay_ms, 500);
        assert!(!config.map.follow_user);
        assert_eq!(config.map.initial_region, MapRegion::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[
            ("NEARBY_API_URL", "http://192.168.15.198:3333"),
            ("NEARBY_API_TIMEOUT_MS", "1500"),
            ("NEARBY_API_CREDENTIALS", "false"),
            ("NEARBY_LOCALE", "en"),
            ("NEARBY_SCAN_DELAY_MS", "250"),
        ]));

        assert_eq!(config.base_url(), "http://192.168.15.198:3333");
        assert_eq!(config.api.timeout(), Duration::from_millis(1500));
        assert!(!config.api.with_credentials);
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.ui.scan_confirm_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[
            ("NEARBY_API_TIMEOUT_MS", "soon"),
            ("NEARBY_API_CREDENTIALS", "maybe"),
            ("NEARBY_LOCALE", "klingon"),
            ("NEARBY_SCAN_DELAY_MS", "later"),
        ]));

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_parse_millis() {
        let vars = env(&[("A", " 250 "), ("B", "-1"), ("C", "half a second")]);
        assert_eq!(parse_millis(&vars, "A"), Some(250));
        assert_eq!(parse_millis(&vars, "B"), None);
        assert_eq!(parse_millis(&vars, "C"), None);
        assert_eq!(parse_millis(&vars, "D"), None);
    }

    #[test]
    fn test_load_unvalidated_defers_validation() {
        let path = std::env::temp_dir().join(format!(
            "nearby-client-bad-url-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api]\nbase_url = \"ftp://files.local\"\n").unwrap();

        let loaded = ClientConfig::load_unvalidated(Some(path.clone()));
        let strict = ClientConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        let mut config = loaded.unwrap();
        assert!(config.validate().is_err());
        assert!(strict.unwrap_err().is_config_error());

        config.api.base_url = "http://127.0.0.1:3333".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.com".into();
        assert!(config.validate().is_ok());

        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());

        config.api.timeout_ms = 700;
        config.map.initial_region.center.latitude = 123.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://192.168.15.198:3333".into();
        config.ui.locale = Locale::En;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("locale = \"en\""));

        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://10.0.0.2:3333"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.api.base_url, "http://10.0.0.2:3333");
        assert_eq!(parsed.api.timeout_ms, 700);
        assert_eq!(parsed.ui.locale, Locale::PtBr);
    }
}
