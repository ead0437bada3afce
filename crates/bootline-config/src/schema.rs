//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use bootline_protocols::loader::ConflictPolicy;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,
}

impl Config {
    /// Enabled extension entries, in declaration order.
    pub fn enabled_extensions(&self) -> impl Iterator<Item = &ExtensionEntry> {
        self.extensions.iter().filter(|entry| entry.enabled)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Write daily rolling log files to [`default_log_dir`].
    #[serde(default)]
    pub file: bool,

    /// Directory for daily rolling log files; implies `file`.
    #[serde(default)]
    pub file_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Where log files go, or `None` for console only.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.file_dir
            .clone()
            .or_else(|| self.file.then(default_log_dir))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: false,
            file_dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Default directory for log files (`~/.bootline/logs`).
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".bootline").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".bootline/logs"))
}

/// Module loader configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Initial module name to location table.
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

/// One extension to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionEntry {
    /// Module name handed to the loader.
    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Context passed to the extension's factory and entry point.
    #[serde(default)]
    pub context: serde_json::Value,
}

impl ExtensionEntry {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            enabled: true,
            context: serde_json::Value::Null,
        }
    }
}

fn default_true() -> bool {
    true
}
