//! Tracker configuration

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::TrackerError;

/// Default Bus Tracker v3 endpoint root
pub const DEFAULT_BUS_BASE_URL: &str = "https://ctabustracker.com/bustime/api/v3";

/// Default Train Tracker v1.0 endpoint root
pub const DEFAULT_TRAIN_BASE_URL: &str = "https://lapi.transitchicago.com/api/1.0";

/// Configuration shared by the bus and train trackers
///
/// The same CTA developer key is sent with every request. Bus Tracker and
/// Train Tracker keys are issued separately by the CTA, so a program using
/// both usually holds two configurations.
#[derive(Clone, Deserialize)]
pub struct TrackerConfig {
    /// CTA developer API key
    pub api_key: SecretString,

    /// Bus Tracker base URL
    #[serde(default = "default_bus_base_url")]
    pub bus_base_url: String,

    /// Train Tracker base URL
    #[serde(default = "default_train_base_url")]
    pub train_base_url: String,

    /// Bus Tracker response language
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Connect + read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_bus_base_url() -> String {
    DEFAULT_BUS_BASE_URL.to_string()
}

fn default_train_base_url() -> String {
    DEFAULT_TRAIN_BASE_URL.to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("cta-tracker/{}", env!("CARGO_PKG_VERSION"))
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("api_key", &"[REDACTED]")
            .field("bus_base_url", &self.bus_base_url)
            .field("train_base_url", &self.train_base_url)
            .field("locale", &self.locale)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl TrackerConfig {
    /// Create a configuration with the given API key and default endpoints
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            bus_base_url: default_bus_base_url(),
            train_base_url: default_train_base_url(),
            locale: default_locale(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Self::new("test-key")
        }
    }

    /// Override the Bus Tracker base URL
    #[must_use]
    pub fn with_bus_base_url(mut self, url: impl Into<String>) -> Self {
        self.bus_base_url = url.into();
        self
    }

    /// Override the Train Tracker base URL
    #[must_use]
    pub fn with_train_base_url(mut self, url: impl Into<String>) -> Self {
        self.train_base_url = url.into();
        self
    }

    /// Set the Bus Tracker response language (e.g. "es")
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from an optional `cta-tracker.{toml,json,yaml}`
    /// file and `CTA_*` environment variables (e.g. `CTA_API_KEY`,
    /// `CTA_BUS_BASE_URL`), environment taking precedence.
    pub fn load() -> Result<Self, TrackerError> {
        let source = config::Config::builder()
            .add_source(config::File::with_name("cta-tracker").required(false))
            .add_source(config::Environment::with_prefix("CTA"))
            .build()
            .map_err(|e| TrackerError::Configuration(e.to_string()))?;

        Self::from_config(source)
    }

    /// Deserialize and validate a configuration from an assembled source
    pub fn from_config(source: config::Config) -> Result<Self, TrackerError> {
        let config: Self = source
            .try_deserialize()
            .map_err(|e| TrackerError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(TrackerError::Configuration(
                "api_key must not be empty".to_string(),
            ));
        }

        validate_base_url("bus_base_url", &self.bus_base_url)?;
        validate_base_url("train_base_url", &self.train_base_url)?;

        if self.locale.trim().is_empty() {
            return Err(TrackerError::Configuration(
                "locale must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(TrackerError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(name: &str, value: &str) -> Result<(), TrackerError> {
    let url = Url::parse(value)
        .map_err(|e| TrackerError::Configuration(format!("{name} is not a valid URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TrackerError::Configuration(format!(
            "{name} must use http or https, got {other}"
        ))),
    }
}
