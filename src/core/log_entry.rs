//! Log entry structure

use super::log_context::{FieldValue, LogContext, REQUEST_ID_KEY};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a failure attached to an ERROR or CRITICAL entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSnapshot {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorSnapshot {
    /// Capture name and message of `error`; the source chain stands in for a stack
    pub fn capture<E>(error: &E, with_stack: bool) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let full_name = std::any::type_name::<E>();
        let name = if full_name.starts_with("dyn ") {
            "Error".to_string()
        } else {
            full_name
                .rsplit("::")
                .next()
                .unwrap_or(full_name)
                .trim_end_matches('>')
                .to_string()
        };

        let stack = if with_stack {
            let mut chain = Vec::new();
            let mut current = error.source();
            while let Some(cause) = current {
                chain.push(format!("caused by: {}", cause));
                current = cause.source();
            }
            (!chain.is_empty()).then(|| chain.join("\n"))
        } else {
            None
        };

        Self {
            name,
            message: error.to_string(),
            stack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: Self::sanitize_message(&message),
            context: None,
            error: None,
            request_id: None,
            session_id: None,
        }
    }

    /// Attach context; a string `requestId` field is also lifted onto the entry
    pub fn with_context(mut self, context: LogContext) -> Self {
        if let Some(FieldValue::String(id)) = context.get(REQUEST_ID_KEY) {
            self.request_id = Some(id.clone());
        }
        self.context = Some(context);
        self
    }

    pub fn with_error(mut self, error: ErrorSnapshot) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// The context `type` tag, if any
    pub fn context_type(&self) -> Option<&str> {
        self.context.as_ref().and_then(LogContext::context_type)
    }
}
