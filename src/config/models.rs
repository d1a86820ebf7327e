// src/config/models.rs
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::ConfigError;

/// Raw settings as they come out of the configuration sources. Keys are
/// folded to lowercase before deserializing, so `ApiSettings`, `apiSettings`
/// and `APISETTINGS` all land here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(rename = "apisettings", default)]
    pub api_settings: ApiSettings,
    #[serde(rename = "workersettings", default)]
    pub worker_settings: WorkerSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSettings {
    #[serde(rename = "apihealthendpoint")]
    pub api_health_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerSettings {
    #[serde(rename = "secondsdelay")]
    pub seconds_delay: Option<String>,
    #[serde(rename = "requesttimeoutseconds")]
    pub request_timeout_seconds: Option<String>,
}

/// Validated worker configuration. Read-only once the loop starts.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub endpoint: Url,
    pub interval: Duration,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    pub fn validate(&self) -> Result<WorkerConfig, ConfigError> {
        let raw_endpoint = self
            .api_settings
            .api_health_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        let endpoint = Url::parse(raw_endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            value: raw_endpoint.to_string(),
            source,
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(endpoint.scheme().to_string()));
        }

        let raw_delay = self
            .worker_settings
            .seconds_delay
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingInterval)?;

        let interval = parse_positive_secs(raw_delay)
            .ok_or_else(|| ConfigError::InvalidInterval(raw_delay.to_string()))?;

        let request_timeout = match self
            .worker_settings
            .request_timeout_seconds
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(raw) => Some(
                parse_positive_secs(raw).ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))?,
            ),
            None => None,
        };

        Ok(WorkerConfig {
            endpoint,
            interval,
            request_timeout,
        })
    }
}

fn parse_positive_secs(raw: &str) -> Option<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}
