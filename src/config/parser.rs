//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that layers defaults, `.env`, environment and CLI flags
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        match self.cli.color_override() {
            Some(enabled) => config.enable_color = enabled,
            None => config.enable_color = config.enable_color && crate::cli::supports_color(),
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if let Some(level) = &self.cli.log_level {
            config.log_level = Some(level.clone());
        }

        if let Some(url) = &self.cli.geo_api_url {
            config.geo_api_url = url.clone();
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary shown in debug mode
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));
    summary.push(format!("Log Level: {}", config.log_level.as_deref().unwrap_or("(derived)")));
    summary.push(format!("Check Timeout: {}s", config.check_timeout_seconds));
    summary.push(format!("Lookup Timeout: {}s", config.lookup_timeout_seconds));
    summary.push(format!("Geolocation API: {}", config.geo_api_url));
    summary.push(format!("IPv4 Ranges: {}", config.ipv4_ranges_url));
    summary.push(format!("IPv6 Ranges: {}", config.ipv6_ranges_url));
    summary.push(format!("DSTAT Interval: {}ms", config.dstat_interval_ms));

    summary.join("\n")
}
