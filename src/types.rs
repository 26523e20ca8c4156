//! Type definitions shared across the diagnostic tools

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Online/offline classification reported by PING and CHECK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStatus {
    Online,
    Offline,
}

impl HostStatus {
    /// Classify an HTTP status code; only server errors count as offline
    pub fn from_http_status(code: u16) -> Self {
        if code >= 500 {
            Self::Offline
        } else {
            Self::Online
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip scheme prefixes and any path from user input so only the host remains.
///
/// `https://example.com/path` and `http://example.com` both become `example.com`.
pub fn clean_target(input: &str) -> String {
    let stripped = input.replace("https://", "").replace("http://", "");
    match stripped.split_once('/') {
        Some((host, _)) => host.to_string(),
        None => stripped,
    }
}
