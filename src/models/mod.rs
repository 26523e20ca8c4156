//! Data models for the diagnostics console

pub mod config;

// Re-export main model types
pub use config::Config;
