//! # Trellis Logging
//!
//! Installs a `tracing` subscriber for Trellis binaries and bridges records
//! emitted through the `log` facade (which the core library uses) into it.
//!
//! Output goes to stderr, as plain text or one JSON object per line. The
//! filter comes from [`LoggingConfig::level`] unless `RUST_LOG` is set.
use std::io;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Environment variable that overrides the configured filter.
pub const FILTER_ENV: &str = "RUST_LOG";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected 'plain' or 'json'", other)),
        }
    }
}

/// Errors raised while configuring logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid logging configuration: {0}")]
    Config(String),

    #[error("Invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("Failed to install logger: {0}")]
    Install(String),
}

/// Logging settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `trellis_core=debug,warn`.
    pub level: String,
    pub format: LogFormat,
    /// Include the event target (module path) in each line.
    pub with_target: bool,
    /// Ignore `RUST_LOG` even when it is set.
    pub ignore_env: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
            with_target: false,
            ignore_env: false,
        }
    }
}

impl LoggingConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, LoggingError> {
        toml::from_str(data).map_err(|e| LoggingError::Config(e.to_string()))
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the event filter, preferring `RUST_LOG` when present.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if !self.ignore_env {
            if let Ok(from_env) = std::env::var(FILTER_ENV) {
                return parse_filter(&from_env);
            }
        }
        parse_filter(&self.level)
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::Filter {
        filter: directive.to_string(),
        message: e.to_string(),
    })
}

fn format_layer(config: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Plain => fmt::layer()
            .with_target(config.with_target)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(config.with_target)
            .with_writer(io::stderr)
            .boxed(),
    }
}

/// Install the global subscriber and the `log` bridge.
///
/// Fails if a global subscriber or logger is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;
    let subscriber = tracing_subscriber::registry().with(format_layer(config).with_filter(filter));
    tracing::subscriber::set_global_default(subscriber).map_err(|e| LoggingError::Install(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| LoggingError::Install(e.to_string()))?;
    log::debug!("Logging initialized ({:?}, level '{}')", config.format, config.level);
    Ok(())
}

#[cfg(test)]
mod tests;
