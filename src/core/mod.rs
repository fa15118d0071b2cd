//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use config::{LoggerConfig, DEFAULT_PERSISTENCE_KEY};
pub use error::{ClientError, Result};
pub use log_context::{FieldValue, LogContext, CONTEXT_TYPE_KEY, REQUEST_ID_KEY};
pub use log_entry::{ErrorSnapshot, LogEntry};
pub use log_level::LogLevel;
pub use logger::{
    LogExport, LogStats, Logger, LoggerBuilder, API_REQUEST_TYPE, API_RESPONSE_TYPE,
    USER_ACTION_TYPE,
};
pub use metrics::LoggerMetrics;
