//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use rftip_client::prelude::*;
//! use rftip_client::info;
//!
//! let logger = Logger::builder().console(false).build().unwrap();
//!
//! info!(logger, "Dashboard loaded");
//!
//! let tracks = 12;
//! info!(logger, "Fetched {} tracks", tracks);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rftip_client::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use rftip_client::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Upload failed with status {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rftip_client::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use rftip_client::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, LoggerConfig};

    fn logger() -> Logger {
        Logger::new(
            LoggerConfig::default()
                .with_console(false)
                .with_min_level(LogLevel::Debug),
        )
    }

    #[test]
    fn test_log_macro() {
        let logger = logger();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        assert_eq!(logger.entries()[1].message, "Formatted: 42");
    }

    #[test]
    fn test_level_macros() {
        let logger = logger();
        debug!(logger, "Debug message");
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        critical!(logger, "Critical failure: {}", "storage");

        let levels: Vec<_> = logger.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
    }
}
