//! Network Diagnostics Console
//!
//! An interactive read-eval console exposing a handful of network
//! diagnostic tools: a live traffic sampler, a TCP latency prober,
//! a multi-record DNS inspector and several single-shot lookups.

pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod dns;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use console::{Console, Flow, Toolkit};
pub use error::{AppError, Result};
pub use models::Config;
pub use types::HostStatus;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// CHECK issues a single GET bounded by this timeout
    pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(20);
    /// INFO and CFIP requests
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

    pub const DEFAULT_GEO_API_URL: &str = "https://ipwhois.app/json/";
    pub const DEFAULT_IPV4_RANGES_URL: &str = "https://www.cloudflare.com/ips-v4";
    pub const DEFAULT_IPV6_RANGES_URL: &str = "https://www.cloudflare.com/ips-v6";

    pub const DEFAULT_DSTAT_INTERVAL: Duration = Duration::from_secs(1);

    pub const PROBE_ATTEMPTS: u32 = 5;
    pub const PROBE_PORT: u16 = 80;
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
    pub const PROBE_INTERVAL: Duration = Duration::from_millis(200);

    pub const TXT_DISPLAY_LIMIT: usize = 100;

    pub const USER_AGENT: &str = concat!("netdiag-console/", env!("CARGO_PKG_VERSION"));
}
