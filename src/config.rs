//! Typed settings with layered precedence (defaults → file → env → CLI).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::api::cache::{clamp_minutes, DEFAULT_CACHE_MINUTES};

const LOCAL_CONFIG_BASENAME: &str = "fika";
const ENV_PREFIX: &str = "FIKA";
const DEFAULT_CITY: &str = "stockholm";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("invalid api_url {0:?}: expected an http(s) URL")]
    InvalidApiUrl(String),
    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Values as read from files and the environment, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub api_url: Option<String>,
    pub cache_minutes: Option<i64>,
    pub default_city: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Command-line values that win over every other layer
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub cache_minutes: Option<i64>,
    pub log_level: Option<String>,
}

impl RawSettings {
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.api_url {
            self.api_url = Some(url.clone());
        }
        if let Some(minutes) = overrides.cache_minutes {
            self.cache_minutes = Some(minutes);
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = Some(level.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the fika API; `None` disables remote calls
    pub api_url: Option<String>,
    /// Response cache TTL, always within 1..=1440
    pub cache_minutes: i64,
    /// City key used when none is given
    pub default_city: String,
    pub request_timeout: Duration,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            cache_minutes: DEFAULT_CACHE_MINUTES,
            default_city: DEFAULT_CITY.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_level: LevelFilter::INFO,
        }
    }
}

impl Settings {
    /// Loads `fika.toml` (or `config_file`), then `FIKA__*` variables, then `overrides`
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let mut raw: RawSettings = builder.build()?.try_deserialize()?;
        raw.apply_overrides(overrides);
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let api_url = match raw.api_url.map(|url| url.trim().to_string()) {
            Some(url) if url.is_empty() => None,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => Some(url),
            Some(url) => return Err(ConfigError::InvalidApiUrl(url)),
            None => None,
        };

        let timeout_secs = raw
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let level = raw
            .log_level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_level =
            LevelFilter::from_str(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?;

        let default_city = raw
            .default_city
            .map(|city| city.trim().to_lowercase())
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        Ok(Self {
            api_url,
            cache_minutes: clamp_minutes(raw.cache_minutes.unwrap_or(DEFAULT_CACHE_MINUTES)),
            default_city,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}
