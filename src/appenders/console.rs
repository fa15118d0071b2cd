//! Console appender implementation

use crate::core::{Appender, LogEntry, Result};
#[cfg(feature = "console")]
use colored::Colorize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Writes one line per entry, ERROR and CRITICAL to stderr, the rest to stdout
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format an entry as `[timestamp] [LEVEL] message key=value ...`
    pub fn format_line(&self, entry: &LogEntry) -> String {
        let level_str = self.level_label(entry);
        let timestamp_str = entry.timestamp.format(TIMESTAMP_FORMAT);

        let mut line = format!("[{}] [{}] {}", timestamp_str, level_str, entry.message);

        if let Some(ref context) = entry.context {
            if !context.is_empty() {
                line.push(' ');
                line.push_str(&context.format_fields());
            }
        }

        if let Some(ref error) = entry.error {
            line.push_str(&format!(" error={}: {}", error.name, error.message));
        }

        line
    }

    #[cfg(feature = "console")]
    fn level_label(&self, entry: &LogEntry) -> String {
        let label = format!("{:8}", entry.level.to_str());
        if self.use_colors {
            label.color(entry.level.color_code()).to_string()
        } else {
            label
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, entry: &LogEntry) -> String {
        let _ = self.use_colors;
        format!("{:8}", entry.level.to_str())
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        if entry.level.is_error() {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
