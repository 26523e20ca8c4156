//! Command-line interface for launching the console

use clap::Parser;

/// Network Diagnostics Console - interactive network troubleshooting tools
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "netdiag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug logging (JSON entries with source locations)
    #[arg(long)]
    pub debug: bool,

    /// Minimum log level (trace, debug, info, warn, error, fatal)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Geolocation API base URL used by INFO
    #[arg(long, value_name = "URL")]
    pub geo_api_url: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        Ok(())
    }

    /// Explicit color choice from flags, `None` when auto-detection applies
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    true
}
