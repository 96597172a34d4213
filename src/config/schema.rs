//! Typed view over the merged configuration tree.
//!
//! The loader produces an untyped [`serde_yaml::Value`]; this module reads
//! the sections the dashboard needs out of it. Every section has defaults so
//! a config file only has to carry what differs.

use super::error::SettingsError;
use super::tree::get_path;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Root settings structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// The baby being tracked
    pub baby: BabyConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Agenda database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Highlighted dates shown on the dashboard
    #[serde(default)]
    pub dates: Vec<DateEntry>,
}

impl Settings {
    /// Read the settings out of a loaded configuration tree.
    pub fn from_tree(tree: &Value) -> Result<Self, SettingsError> {
        if get_path(tree, "baby.conception_date").is_none() {
            return Err(SettingsError::Missing("baby.conception_date".to_string()));
        }
        Ok(serde_yaml::from_value(tree.clone())?)
    }
}

/// Baby configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BabyConfig {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Conception date, `YYYY-MM-DD`
    pub conception_date: NaiveDate,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number for HTTP server
    pub port: u16,
    /// Directory holding the avatar image
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("res/img"),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://jantje.db`
    pub url: String,
    /// Log every statement
    pub echo: bool,
    /// Check a pooled connection before handing it out
    pub pool_pre_ping: bool,
    /// Maximum connection lifetime in seconds
    pub pool_recycle_secs: u64,
    /// Steady-state pool size
    pub pool_size: u32,
    /// Connections allowed on top of `pool_size`
    pub pool_overflow: u32,
    /// Create the schema on connect
    pub create_tables: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://jantje.db".to_string(),
            echo: false,
            pool_pre_ping: true,
            pool_recycle_secs: 10,
            pool_size: 5,
            pool_overflow: 10,
            create_tables: true,
        }
    }
}

impl DatabaseConfig {
    /// Upper bound on open connections
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.pool_overflow).max(1)
    }

    /// Get connection lifetime as Duration
    pub fn recycle_after(&self) -> Duration {
        Duration::from_secs(self.pool_recycle_secs)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

/// A highlighted date on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: String,
    pub description: String,
}
