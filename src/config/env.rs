//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if present
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; a missing file is not an error
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Check one variable's format and range before it is merged into the config
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_LEVEL" => {
                value.parse::<crate::logging::LogLevel>()
                    .map_err(|e| AppError::config(format!("Invalid LOG_LEVEL value '{}': {}", value, e.detail())))?;
            }
            "CHECK_TIMEOUT_SECONDS" | "LOOKUP_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!("{} must be between 1 and 300, got: {}", key, timeout)));
                }
            }
            "GEO_API_URL" | "IPV4_RANGES_URL" | "IPV6_RANGES_URL" => {
                url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "DSTAT_INTERVAL_MS" => {
                let interval: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid DSTAT_INTERVAL_MS value '{}': {}", value, e)))?;
                if !(100..=60_000).contains(&interval) {
                    return Err(AppError::config(format!("DSTAT_INTERVAL_MS must be between 100 and 60000, got: {}", interval)));
                }
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_LEVEL", "Minimum log level written to stderr", "warn"),
            ("CHECK_TIMEOUT_SECONDS", "CHECK request timeout in seconds (1-300)", "20"),
            ("LOOKUP_TIMEOUT_SECONDS", "INFO/CFIP request timeout in seconds (1-300)", "10"),
            ("GEO_API_URL", "Geolocation API base URL", "https://ipwhois.app/json/"),
            ("IPV4_RANGES_URL", "IPv4 range list fetched by CFIP", "https://www.cloudflare.com/ips-v4"),
            ("IPV6_RANGES_URL", "IPv6 range list fetched by CFIP", "https://www.cloudflare.com/ips-v6"),
            ("DSTAT_INTERVAL_MS", "DSTAT sampling interval in milliseconds", "1000"),
        ]
    }
}
