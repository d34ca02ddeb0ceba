//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! field has a default so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::transport::WrapperConfig;

/// Root configuration of the tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where and how much to log.
    pub logging: LoggingConfig,

    /// Verbosity levels of the transport wrapper.
    pub transport: WrapperConfig,
}

/// Output format of the log.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human readable lines through the tracing subscriber.
    Text,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum verbosity written. Records with a higher level are dropped.
    pub v: i64,

    /// Output format.
    pub format: LogFormat,

    /// Log file. Standard error when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            v: 0,
            format: LogFormat::Json,
            file: None,
        }
    }
}
