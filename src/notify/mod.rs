//! User-facing notifications and the error dispatcher

pub mod center;
pub mod dispatcher;
pub mod notification;

pub use center::NotificationCenter;
pub use dispatcher::{DispatchOutcome, NotificationDispatcher, WrapOptions};
pub use notification::{
    Notification, NotificationKind, DEFAULT_DURATION_MS, ERROR_DURATION_MS,
    NETWORK_ERROR_DURATION_MS,
};
