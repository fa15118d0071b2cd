//! Output sinks for log entries

use super::{error::Result, log_entry::LogEntry};

/// A sink that receives every entry that passes the level filter
///
/// The logger calls appenders one at a time under its own lock. An error
/// or panic from one appender is reported on stderr and counted; it never
/// reaches the caller or the other appenders.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
