//! Logger configuration

use super::error::{ClientError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Storage key used for persisted log history unless configured otherwise
pub const DEFAULT_PERSISTENCE_KEY: &str = "app_logs";

/// Process-wide logger configuration
///
/// Set once when the logger is built. Only the minimum level can change
/// afterwards, through `Logger::set_min_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Entries below this level are dropped before storage or console output
    pub min_level: LogLevel,
    pub enable_console: bool,
    pub enable_persistence: bool,
    pub persistence_key: String,
    /// Capacity of the in-memory history and of the persisted snapshot
    pub max_stored_entries: usize,
    /// Record the source chain of failures attached to ERROR/CRITICAL entries
    pub capture_stack_trace: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            enable_console: true,
            enable_persistence: true,
            persistence_key: DEFAULT_PERSISTENCE_KEY.to_string(),
            max_stored_entries: 1000,
            capture_stack_trace: true,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verbose settings for local development builds
    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            enable_console: true,
            max_stored_entries: 500,
            ..Self::default()
        }
    }

    /// Quiet settings for deployed builds: warnings and above, no console
    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Warning,
            enable_console: false,
            max_stored_entries: 500,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.enable_console = enabled;
        self
    }

    #[must_use]
    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.enable_persistence = enabled;
        self
    }

    #[must_use]
    pub fn with_persistence_key(mut self, key: impl Into<String>) -> Self {
        self.persistence_key = key.into();
        self
    }

    #[must_use]
    pub fn with_max_stored_entries(mut self, max: usize) -> Self {
        self.max_stored_entries = max;
        self
    }

    #[must_use]
    pub fn with_stack_trace(mut self, enabled: bool) -> Self {
        self.capture_stack_trace = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_stored_entries == 0 {
            return Err(ClientError::config(
                "LoggerConfig",
                "max_stored_entries must be greater than zero",
            ));
        }
        if self.enable_persistence && self.persistence_key.trim().is_empty() {
            return Err(ClientError::config(
                "LoggerConfig",
                "persistence_key must not be empty when persistence is enabled",
            ));
        }
        Ok(())
    }
}
