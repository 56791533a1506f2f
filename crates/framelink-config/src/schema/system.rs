//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive for the framelink crates at this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "framelink=trace",
            LogLevel::Debug => "framelink=debug",
            LogLevel::Info => "framelink=info",
            LogLevel::Warn => "framelink=warn",
            LogLevel::Error => "framelink=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
