//! Logging System
//!
//! Structured logging on top of `tracing`. The engine only emits events; hosts decide
//! whether to install a subscriber, usually through [`init_logging`].

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a complete filter directive.
pub const LOG_ENV: &str = "FACETRY_LOG";
const LOG_FORMAT_ENV: &str = "FACETRY_LOG_FORMAT";
const LOG_OUTPUT_ENV: &str = "FACETRY_LOG_OUTPUT";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr or file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path, used when output is "file"
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Colored output (text format on a terminal only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `facetry::query = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("facetry.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        parse_format(&self.format)?;
        parse_output(&self.output)?;
        if self.output == "file" && self.file.as_os_str().is_empty() {
            return Err("Log file path cannot be empty when output is 'file'".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stdout,
    Stderr,
    File,
}

fn parse_format(format: &str) -> Result<LogFormat, String> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        )),
    }
}

fn parse_output(output: &str) -> Result<LogOutput, String> {
    match output {
        "stdout" => Ok(LogOutput::Stdout),
        "stderr" => Ok(LogOutput::Stderr),
        "file" => Ok(LogOutput::File),
        other => Err(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            other
        )),
    }
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. `FACETRY_LOG` filter directive
/// 2. `FACETRY_LOG_FORMAT` / `FACETRY_LOG_OUTPUT`
/// 3. The `[logging]` configuration table
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), EngineError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = build_env_filter(config)?;
    let format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|f| parse_format(&f).ok())
        .map(Ok)
        .unwrap_or_else(|| parse_format(&config.format))
        .map_err(EngineError::LoggingError)?;
    let output = std::env::var(LOG_OUTPUT_ENV)
        .ok()
        .and_then(|o| parse_output(&o).ok())
        .map(Ok)
        .unwrap_or_else(|| parse_output(&config.output))
        .map_err(EngineError::LoggingError)?;

    let registry = Registry::default().with(filter);
    let timer = ChronoUtc::rfc_3339();

    let result = match (format, output) {
        (LogFormat::Json, LogOutput::File) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(timer)
                    .with_writer(std::sync::Mutex::new(open_log_file(config)?)),
            )
            .try_init(),
        (LogFormat::Json, LogOutput::Stdout) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(timer)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        (LogFormat::Json, LogOutput::Stderr) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(timer)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::File) => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(timer)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(open_log_file(config)?)),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::Stdout) => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(timer)
                    .with_ansi(config.color)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        (LogFormat::Text, LogOutput::Stderr) => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(timer)
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| EngineError::LoggingError(e.to_string()))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, EngineError> {
    if let Some(parent) = config.file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| {
            EngineError::LoggingError(format!(
                "Failed to open log file {}: {}",
                config.file.display(),
                e
            ))
        })
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, EngineError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level)
            .parse()
            .map_err(|e| EngineError::LoggingError(format!("Invalid log directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
