//! Process-wide log output.
//!
//! The library itself only emits `tracing` events and never installs a
//! subscriber; binaries call [`init`] once at startup.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ErrorCategory, PassboxError, Result};

/// Environment variable consulted before the configured level.
pub const LOG_ENV: &str = "PASSBOX_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = PassboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(PassboxError::new(
                ErrorCategory::User,
                format!("unknown log format '{}' (expected 'text' or 'json')", other),
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `warn` or `passbox=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Build the filter: `PASSBOX_LOG`, then `RUST_LOG`, then `level`.
    pub fn filter(&self) -> Result<EnvFilter> {
        if let Ok(directive) = std::env::var(LOG_ENV) {
            return parse_filter(&directive);
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => parse_filter(&self.level),
        }
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| {
        PassboxError::with_source(
            ErrorCategory::User,
            format!("invalid log filter '{}'", directive),
            e,
        )
    })
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(tfmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(tfmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| {
        PassboxError::with_source(
            ErrorCategory::Internal,
            "failed to install log subscriber",
            e,
        )
    })
}
