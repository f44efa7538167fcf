//! Configuration loading from waypoint.toml and the environment.

use partners::{PartnerDirectory, RemoteDirectory};
use serde::Deserialize;
use std::path::Path;
use weather::WeatherClient;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Model backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Weather provider configuration.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Partner directory configuration.
    #[serde(default)]
    pub partners: PartnersConfig,
}

/// Model backend configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Anthropic API key; falls back to ANTHROPIC_API_KEY.
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
        }
    }
}

/// Weather provider configuration. With no key configured anywhere,
/// forecasts come from the deterministic offline generator.
#[derive(Debug, Deserialize, Default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; falls back to OPENWEATHERMAP_API_KEY.
    pub api_key: Option<String>,
}

/// Partner directory configuration.
#[derive(Debug, Deserialize)]
pub struct PartnersConfig {
    /// Partner source: "static" (seeded table) or "remote".
    #[serde(default = "default_partner_source")]
    pub source: String,

    /// Base URL of the remote partner search service; falls back to
    /// PARTNER_API_URL. Required when source = "remote".
    pub base_url: Option<String>,
}

impl Default for PartnersConfig {
    fn default() -> Self {
        Self {
            source: default_partner_source(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_partner_source() -> String {
    "static".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The model to use, honoring the WAYPOINT_MODEL override.
    pub fn model(&self) -> String {
        std::env::var("WAYPOINT_MODEL").unwrap_or_else(|_| self.backend.model.clone())
    }

    /// The Anthropic API key from config or environment.
    pub fn anthropic_api_key(&self) -> Result<String, ConfigError> {
        self.backend
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Build the weather client; no credential means the offline path.
    pub fn weather_client(&self) -> WeatherClient {
        let api_key = self
            .weather
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENWEATHERMAP_API_KEY").ok());
        WeatherClient::new(api_key)
    }

    /// Build the configured partner directory.
    pub fn partner_directory(&self) -> Result<PartnerDirectory, ConfigError> {
        match self.partners.source.as_str() {
            "static" => Ok(PartnerDirectory::seeded()),
            "remote" => {
                let base_url = self
                    .partners
                    .base_url
                    .clone()
                    .or_else(|| std::env::var("PARTNER_API_URL").ok())
                    .ok_or(ConfigError::MissingPartnerUrl)?;
                Ok(PartnerDirectory::Remote(RemoteDirectory::new(base_url)))
            }
            other => Err(ConfigError::UnknownPartnerSource(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set backend.api_key or ANTHROPIC_API_KEY")]
    MissingApiKey,

    #[error("partners.source is 'remote' but no base_url or PARTNER_API_URL is set")]
    MissingPartnerUrl,

    #[error("unknown partner source '{0}' (expected 'static' or 'remote')")]
    UnknownPartnerSource(String),
}
