//! Output styling and number formatting for the console
//!
//! Tools render plain lines; this module decides whether those lines carry
//! ANSI styling and how byte/count figures are humanized.

mod colored;
pub mod units;

pub use self::colored::Presenter;
pub use units::{format_bytes, format_count};

/// Terminal reset sequence emitted by CLEAR
pub const CLEAR_SCREEN: &str = "\x1bc";
