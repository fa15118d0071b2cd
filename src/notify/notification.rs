//! User-visible notification record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lifetime of a notification pushed without an explicit duration
pub const DEFAULT_DURATION_MS: u64 = 3_000;
/// Lifetime of an error notification for a NETWORK failure
pub const NETWORK_ERROR_DURATION_MS: u64 = 8_000;
/// Lifetime of every other error notification
pub const ERROR_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// 0 keeps the notification until it is removed
    pub duration_ms: u64,
}

impl Notification {
    pub fn is_sticky(&self) -> bool {
        self.duration_ms == 0
    }

    /// Time until automatic removal, `None` for sticky notifications
    pub fn lifetime(&self) -> Option<Duration> {
        (!self.is_sticky()).then(|| Duration::from_millis(self.duration_ms))
    }
}
