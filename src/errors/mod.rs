//! Error taxonomy, message tables and classification

pub mod app_error;
pub mod classifier;
pub mod kind;
pub mod messages;

pub use app_error::{AppError, ErrorCode, ErrorDisplay, Failure, FieldError};
pub use classifier::{classify, ErrorClassifier};
pub use kind::ErrorKind;
pub use messages::{Locale, MessageCatalog, ServerCode};
