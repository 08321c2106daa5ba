//! Configuration management for the `LocalConnect` assistant
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::LocalConnectError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the `LocalConnect` assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConnectConfig {
    /// HTTP transport settings
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Places search provider settings
    #[serde(default)]
    pub places: PlacesConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// LLM completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key; the assistant answers general questions only when set
    pub api_key: Option<String>,
    /// Model name used in the `generateContent` path
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Base URL of the models endpoint
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Which geocoding backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingProvider {
    #[default]
    Google,
    OpenCage,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Resolve free-text locations to coordinates before searching
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub provider: GeocodingProvider,
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Places search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Google Places key; without it only the built-in directory is used
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    /// Search bias radius in meters, applied when coordinates are known
    #[serde(default = "default_places_radius")]
    pub radius_meters: u32,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_llm_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place/textsearch/json".to_string()
}

fn default_places_radius() -> u32 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            temperature: default_llm_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: GeocodingProvider::default(),
            api_key: None,
            base_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
            radius_meters: default_places_radius(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LocalConnectConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // LOCALCONNECT_LLM__MODEL=... style overrides
        builder = builder.add_source(
            Environment::with_prefix("LOCALCONNECT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LocalConnectConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credentials_from(|name| env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("localconnect").join("config.toml"))
    }

    /// Fill missing credentials from the conventional provider variables
    pub fn apply_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("GOOGLE_API_KEY");
        }
        if self.places.api_key.is_none() {
            self.places.api_key = lookup("GOOGLE_PLACES_API_KEY");
        }
        if self.geocoding.api_key.is_none() {
            self.geocoding.api_key = match self.geocoding.provider {
                GeocodingProvider::Google => lookup("GOOGLE_PLACES_API_KEY"),
                GeocodingProvider::OpenCage => lookup("OPENCAGE_API_KEY"),
            };
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        // Blank credentials count as missing
        for key in [
            &mut self.llm.api_key,
            &mut self.geocoding.api_key,
            &mut self.places.api_key,
        ] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }

        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_timeout();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.places.base_url.is_empty() {
            self.places.base_url = default_places_base_url();
        }
        if self.places.radius_meters == 0 {
            self.places.radius_meters = default_places_radius();
        }
        if self.places.timeout_seconds == 0 {
            self.places.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("LLM", self.llm.timeout_seconds),
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Places", self.places.timeout_seconds),
        ] {
            if timeout > 300 {
                return Err(LocalConnectError::config(format!(
                    "{name} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(
                LocalConnectError::config("LLM temperature must be between 0.0 and 2.0").into(),
            );
        }

        if self.places.radius_meters > 50_000 {
            return Err(LocalConnectError::config(
                "Places search radius cannot exceed 50000 meters",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LocalConnectError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LocalConnectError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("LLM", Some(self.llm.base_url.as_str())),
            ("Geocoding", self.geocoding.base_url.as_deref()),
            ("Places", Some(self.places.base_url.as_str())),
        ];
        for (name, url) in urls {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(LocalConnectError::config(format!(
                        "{name} base URL must be a valid HTTP or HTTPS URL"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LocalConnectConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.places.radius_meters, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.geocoding.enabled);
        assert_eq!(config.geocoding.provider, GeocodingProvider::Google);
        assert!(config.llm.api_key.is_none());
        assert!(config.places.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_from_conventional_variables() {
        let vars = HashMap::from([
            ("GOOGLE_API_KEY", "llm-key"),
            ("GOOGLE_PLACES_API_KEY", "places-key"),
            ("OPENCAGE_API_KEY", "opencage-key"),
        ]);
        let lookup = |name: &str| vars.get(name).map(|v| (*v).to_string());

        let mut config = LocalConnectConfig::default();
        config.apply_credentials_from(lookup);
        assert_eq!(config.llm.api_key.as_deref(), Some("llm-key"));
        assert_eq!(config.places.api_key.as_deref(), Some("places-key"));
        assert_eq!(config.geocoding.api_key.as_deref(), Some("places-key"));

        let mut config = LocalConnectConfig::default();
        config.geocoding.provider = GeocodingProvider::OpenCage;
        config.apply_credentials_from(lookup);
        assert_eq!(config.geocoding.api_key.as_deref(), Some("opencage-key"));
    }

    #[test]
    fn test_explicit_credentials_are_kept() {
        let mut config = LocalConnectConfig::default();
        config.llm.api_key = Some("from-file".to_string());
        config.apply_credentials_from(|_| Some("from-env".to_string()));
        assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_blank_credentials_are_treated_as_missing() {
        let mut config = LocalConnectConfig::default();
        config.places.api_key = Some("   ".to_string());
        config.apply_defaults();
        assert!(config.places.api_key.is_none());
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = LocalConnectConfig::default();
        config.places.radius_meters = 0;
        config.llm.timeout_seconds = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.places.radius_meters, 5000);
        assert_eq!(config.llm.timeout_seconds, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = LocalConnectConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = LocalConnectConfig::default();
        config.places.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = LocalConnectConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = LocalConnectConfig::default();
        config.geocoding.base_url = Some("ftp://example.com".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Geocoding base URL"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("localconnect-does-not-exist.toml");
        let config = LocalConnectConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.places.radius_meters, 5000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join("localconnect-config-test.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[geocoding]\nenabled = false\nprovider = \"opencage\"\n",
        )
        .unwrap();

        let config = LocalConnectConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.server.port, 9100);
        assert!(!config.geocoding.enabled);
        assert_eq!(config.geocoding.provider, GeocodingProvider::OpenCage);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = LocalConnectConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("localconnect"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
