//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format and
//! destination come from `LoggingConfig`, overridable through environment
//! variables.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
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
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the global subscriber
///
/// Priority order (highest to lowest):
/// 1. Environment variables (BLOCKMAP_LOG, BLOCKMAP_LOG_FORMAT, BLOCKMAP_LOG_OUTPUT)
/// 2. Configuration (file, then CLI overrides applied by the caller)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ManifestError> {
    let filter = build_env_filter(config)?;
    let writer = match determine_output(config)? {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let layer = match determine_format(config)? {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer
            .with_ansi(config.map(|c| c.color).unwrap_or(true))
            .boxed(),
    };

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| ManifestError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ManifestError> {
    if let Ok(filter) = EnvFilter::try_from_env("BLOCKMAP_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(directive.parse().map_err(|e| {
                ManifestError::ConfigError(format!("Invalid log directive: {}", e))
            })?);
        }
    }

    Ok(filter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<LogFormat, ManifestError> {
    if let Ok(format) = std::env::var("BLOCKMAP_LOG_FORMAT") {
        if let Ok(format) = parse_format(&format) {
            return Ok(format);
        }
    }
    parse_format(config.map(|c| c.format.as_str()).unwrap_or("text"))
}

fn parse_format(format: &str) -> Result<LogFormat, ManifestError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ManifestError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<Output, ManifestError> {
    if let Ok(output) = std::env::var("BLOCKMAP_LOG_OUTPUT") {
        return parse_output(&output);
    }
    parse_output(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

fn parse_output(output: &str) -> Result<Output, ManifestError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        _ => Err(ManifestError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout' or 'stderr')",
            output
        ))),
    }
}
