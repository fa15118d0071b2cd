//! # rftip client
//!
//! Client-side request and error pipeline for the radar dashboard API.
//!
//! ## Components
//!
//! - **Logger**: leveled, bounded, persisted log history with export
//! - **Error classifier**: maps every failed call onto a closed set of kinds
//!   with localized user-facing messages
//! - **HTTP pipeline**: request metadata, timing, logging, timeout and the
//!   forced logout on authentication failure
//! - **Notifications**: timed user notifications and the `wrap` helpers that
//!   surface failed operations
//!
//! ```no_run
//! use rftip_client::prelude::*;
//!
//! # async fn run() -> rftip_client::Result<()> {
//! let client = ClientContext::builder()
//!     .config(ClientConfig::from_env()?)
//!     .build()?;
//!
//! let tracks = client
//!     .dispatcher()
//!     .wrap_with_loading(
//!         client.pipeline().get_json::<serde_json::Value>("/tracks"),
//!         WrapOptions::new().loading("Loading tracks..."),
//!     )
//!     .await;
//! # let _ = tracks;
//! # Ok(())
//! # }
//! ```

pub mod appenders;
pub mod context;
pub mod core;
pub mod errors;
pub mod http;
pub mod macros;
pub mod notify;
pub mod storage;

pub mod prelude {
    pub use crate::appenders::ConsoleAppender;
    pub use crate::context::{ClientConfig, ClientContext, ClientContextBuilder};
    pub use crate::core::{
        Appender, ClientError, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerMetrics, Result,
    };
    pub use crate::errors::{AppError, ErrorClassifier, ErrorKind, Failure, Locale, MessageCatalog};
    pub use crate::http::{
        CredentialStore, HttpPipeline, HttpRequest, HttpResponse, Method, Navigator,
        PipelineConfig, SessionStore, Transport,
    };
    pub use crate::notify::{
        DispatchOutcome, NotificationCenter, NotificationDispatcher, NotificationKind, WrapOptions,
    };
    pub use crate::storage::{MemoryStorage, Storage};
}

pub use appenders::ConsoleAppender;
pub use context::{ClientConfig, ClientContext, ClientContextBuilder};
pub use core::{
    Appender, ClientError, FieldValue, LogContext, LogEntry, LogExport, LogLevel, LogStats,
    Logger, LoggerBuilder, LoggerConfig, LoggerMetrics, Result,
};
pub use errors::{AppError, ErrorKind, Failure};
pub use notify::{NotificationDispatcher, WrapOptions};
