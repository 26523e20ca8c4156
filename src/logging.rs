//! Structured logging for the diagnostics console
//!
//! Entries go to stderr so they never interleave with tool output on stdout.
//! Every logger created by one [`LoggerFactory`] tags its entries with the
//! same session ID; each query a tool answers gets its own correlation ID.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::White,
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Fatal => Color::Magenta,
        }
    }

    /// Minimum level implied by a configuration: an explicit level wins,
    /// then `--debug`, then `--verbose`; errors only otherwise
    pub fn from_config(config: &Config) -> Self {
        if let Some(level) = config.log_level.as_deref().and_then(|l| l.parse().ok()) {
            return level;
        }
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Error
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component that emitted the entry (`CONSOLE`, `NET`, ...)
    pub logger: String,
    /// Ties together the entries of one tool query
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Human-readable lines normally; one JSON object per line in debug mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Console,
    Json,
}

/// Leveled logger writing to stderr
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    session_id: Arc<RwLock<Option<String>>>,
}

impl Logger {
    pub fn with_config(name: &str, config: &Config) -> Self {
        Self {
            min_level: LogLevel::from_config(config),
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            session_id: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_session_id(&self, session_id: String) {
        *self.session_id.write().await = Some(session_id);
    }

    /// Open a correlated span for one tool query and return its ID
    pub async fn begin_command(&self, command: &str, query: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();

        self.debug(&format!("{} started", command))
            .correlation_id(&correlation_id)
            .field("command", command)
            .field("query", query)
            .log()
            .await;

        correlation_id
    }

    /// Close the span opened by [`Logger::begin_command`]
    pub async fn finish_command(&self, correlation_id: &str, command: &str, outcome: std::result::Result<(), &AppError>) {
        let mut builder = self
            .debug(&format!("{} finished", command))
            .correlation_id(correlation_id)
            .field("command", command)
            .field("success", outcome.is_ok());

        if let Err(e) = outcome {
            builder = builder.error_info(e);
        }

        builder.log().await;
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        if let Some(session_id) = self.session_id.read().await.as_ref() {
            entry
                .fields
                .insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }

        let _ = writeln!(io::stderr(), "{}", self.render(&entry));
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let level = format!("{:>5}", entry.level.as_str());
        let level = if self.use_color {
            level.color(entry.level.color()).to_string()
        } else {
            level
        };

        let mut output = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if let (true, Some(location)) = (self.include_location, &entry.location) {
            output.push_str(&format!(" @ {}:{}", location.file, location.line));
        }

        output
    }
}

fn format_json(entry: &LogEntry) -> String {
    serde_json::to_string(entry)
        .unwrap_or_else(|_| format!("{{\"level\":\"{}\",\"message\":{:?}}}", entry.level.as_str(), entry.message))
}

/// Accumulates fields for one entry; nothing is written until [`LogEntryBuilder::log`]
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Attach the error's category and whether a retry could succeed
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
    }

    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Resolver lookups, HTTP exchanges and TCP connection attempts
#[derive(Clone)]
pub struct NetworkLogger {
    logger: Logger,
}

impl NetworkLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("NET", config),
        }
    }

    fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// One record lookup; failures log at warn
    pub async fn log_dns_lookup(&self, name: &str, record_type: &str, result: std::result::Result<usize, &AppError>, duration_ms: f64) {
        let (level, outcome) = match result {
            Ok(count) => (LogLevel::Debug, format!("{} record(s)", count)),
            Err(e) => (LogLevel::Warn, format!("failed: {}", e)),
        };
        let message = format!("{} lookup for {}: {}", record_type, name, outcome);

        let mut builder = self.logger.log(level, &message)
            .field("name", name)
            .field("record_type", record_type)
            .field("success", result.is_ok())
            .field("duration_ms", duration_ms);

        if let Err(e) = result {
            builder = builder.error_info(e);
        }

        builder.log().await;
    }

    /// One HTTP exchange; `status_code` is `None` when no response arrived
    pub async fn log_http_request(&self, url: &str, method: &str, status_code: Option<u16>, duration_ms: f64) {
        let level = if status_code.is_some() { LogLevel::Debug } else { LogLevel::Warn };

        let message = format!("{} {} -> {} in {:.1}ms",
            method, url,
            status_code.map_or("FAILED".to_string(), |c| c.to_string()),
            duration_ms);

        self.logger.log(level, &message)
            .field("url", url)
            .field("method", method)
            .field("status_code", status_code)
            .field("duration_ms", duration_ms)
            .log()
            .await;
    }

    /// One TCP connection attempt
    pub async fn log_connection(&self, target: &str, success: bool, error: Option<&str>) {
        let level = if success { LogLevel::Debug } else { LogLevel::Info };
        let message = if success {
            format!("Connected to {}", target)
        } else {
            format!("Failed to connect to {}: {}", target, error.unwrap_or("unknown error"))
        };

        let mut builder = self.logger.log(level, &message)
            .field("target", target)
            .field("success", success);

        if let Some(err) = error {
            builder = builder.field("error", err);
        }

        builder.log().await;
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Tool failures reported to the user, logged with their category
#[derive(Clone)]
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR", config),
        }
    }

    fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// `command` names the tool; `correlation_id` ties the entry to its query span
    pub async fn log_error(&self, error: &AppError, command: Option<&str>, correlation_id: Option<&str>) {
        let message = match command {
            Some(command) => format!("{}: {}", command, error),
            None => error.to_string(),
        };

        let mut builder = self.logger.error(&message).error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }
        if let Some(command) = command {
            builder = builder.field("command", command);
        }

        builder.log().await;
    }
}

/// Hands out loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub async fn create_network_logger(&self) -> NetworkLogger {
        NetworkLogger::from_logger(self.create_logger("NET").await)
    }

    pub async fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::from_logger(self.create_logger("ERR").await)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Log with the call site attached
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}
