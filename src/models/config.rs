//! Configuration data model and validation

use crate::config::EnvManager;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output (INFO-level logging)
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output (DEBUG-level JSON logging with locations)
    #[serde(default)]
    pub debug: bool,

    /// Explicit minimum log level, overrides verbose/debug when set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Timeout for the reachability check
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_seconds: u64,

    /// Timeout for geolocation and range-list requests
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_seconds: u64,

    /// Geolocation API base; the cleaned target is appended
    #[serde(default = "default_geo_api_url")]
    pub geo_api_url: String,

    /// Published IPv4 range list
    #[serde(default = "default_ipv4_ranges_url")]
    pub ipv4_ranges_url: String,

    /// Published IPv6 range list
    #[serde(default = "default_ipv6_ranges_url")]
    pub ipv6_ranges_url: String,

    /// DSTAT sampling interval in milliseconds
    #[serde(default = "default_dstat_interval_ms")]
    pub dstat_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_level: None,
            check_timeout_seconds: default_check_timeout_secs(),
            lookup_timeout_seconds: default_lookup_timeout_secs(),
            geo_api_url: default_geo_api_url(),
            ipv4_ranges_url: default_ipv4_ranges_url(),
            ipv6_ranges_url: default_ipv6_ranges_url(),
            dstat_interval_ms: default_dstat_interval_ms(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_seconds)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }

    pub fn dstat_interval(&self) -> Duration {
        Duration::from_millis(self.dstat_interval_ms)
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("Check timeout", self.check_timeout_seconds),
            ("Lookup timeout", self.lookup_timeout_seconds),
        ] {
            if secs == 0 {
                return Err(AppError::config(format!("{} must be greater than 0", name)));
            }
            if secs > 300 {
                return Err(AppError::config(format!("{} cannot exceed 300 seconds", name)));
            }
        }

        for (name, value) in [
            ("geolocation API URL", &self.geo_api_url),
            ("IPv4 ranges URL", &self.ipv4_ranges_url),
            ("IPv6 ranges URL", &self.ipv6_ranges_url),
        ] {
            if value.is_empty() {
                return Err(AppError::config(format!("The {} cannot be empty", name)));
            }
            match url::Url::parse(value) {
                Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
                Ok(parsed) => {
                    return Err(AppError::config(format!(
                        "The {} must use http or https, got scheme '{}'",
                        name,
                        parsed.scheme()
                    )));
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid {} '{}': {}", name, value, e)));
                }
            }
        }

        if !(100..=60_000).contains(&self.dstat_interval_ms) {
            return Err(AppError::config(format!(
                "DSTAT interval must be between 100 and 60000 ms, got {}",
                self.dstat_interval_ms
            )));
        }

        if let Some(level) = &self.log_level {
            level.parse::<crate::logging::LogLevel>()?;
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Some(enable_color) = env_value("ENABLE_COLOR")? {
            self.enable_color = parse_env("ENABLE_COLOR", &enable_color)?;
        }

        if let Some(level) = env_value("LOG_LEVEL")? {
            self.log_level = Some(level);
        }

        if let Some(timeout) = env_value("CHECK_TIMEOUT_SECONDS")? {
            self.check_timeout_seconds = parse_env("CHECK_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Some(timeout) = env_value("LOOKUP_TIMEOUT_SECONDS")? {
            self.lookup_timeout_seconds = parse_env("LOOKUP_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Some(url) = env_value("GEO_API_URL")? {
            self.geo_api_url = url;
        }

        if let Some(url) = env_value("IPV4_RANGES_URL")? {
            self.ipv4_ranges_url = url;
        }

        if let Some(url) = env_value("IPV6_RANGES_URL")? {
            self.ipv6_ranges_url = url;
        }

        if let Some(interval) = env_value("DSTAT_INTERVAL_MS")? {
            self.dstat_interval_ms = parse_env("DSTAT_INTERVAL_MS", &interval)?;
        }

        Ok(())
    }
}

/// Trimmed value of a set variable, checked against its format rules
fn env_value(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) => {
            let value = value.trim().to_string();
            EnvManager::validate_env_var(key, &value)?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))
}

// Default value functions for serde
fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_check_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_CHECK_TIMEOUT.as_secs()
}

fn default_lookup_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_LOOKUP_TIMEOUT.as_secs()
}

fn default_geo_api_url() -> String {
    crate::defaults::DEFAULT_GEO_API_URL.to_string()
}

fn default_ipv4_ranges_url() -> String {
    crate::defaults::DEFAULT_IPV4_RANGES_URL.to_string()
}

fn default_ipv6_ranges_url() -> String {
    crate::defaults::DEFAULT_IPV6_RANGES_URL.to_string()
}

fn default_dstat_interval_ms() -> u64 {
    crate::defaults::DEFAULT_DSTAT_INTERVAL.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_timeout(), Duration::from_secs(20));
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.dstat_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = Config::default();
        config.check_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lookup_timeout_seconds = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_url_invalid() {
        let mut config = Config::default();
        config.geo_api_url = "ftp://example.com/json/".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ipv4_ranges_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ipv6_ranges_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interval_bounds() {
        let mut config = Config::default();
        config.dstat_interval_ms = 50;
        assert!(config.validate().is_err());
        config.dstat_interval_ms = 100;
        assert!(config.validate().is_ok());
        config.dstat_interval_ms = 60_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.log_level = Some("chatty".to_string());
        assert!(config.validate().is_err());
        config.log_level = Some("warn".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert!(config.verbose);
        assert_eq!(config.geo_api_url, crate::defaults::DEFAULT_GEO_API_URL);
        assert_eq!(config.dstat_interval_ms, 1000);
    }
}
