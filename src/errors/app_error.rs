//! The classified call error and its wire contract

use super::kind::ErrorKind;
use super::messages::MessageCatalog;
use crate::core::{ClientError, LogContext};
use crate::http::RawFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// HTTP status or server-defined token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Numeric(i64),
    Token(String),
}

impl ErrorCode {
    /// Code of a failure that never reached the server
    pub const NO_RESPONSE: ErrorCode = ErrorCode::Numeric(0);

    pub fn as_token(&self) -> Option<&str> {
        match self {
            ErrorCode::Token(token) => Some(token),
            ErrorCode::Numeric(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ErrorCode::Numeric(n) => Some(*n),
            ErrorCode::Token(_) => None,
        }
    }

    pub fn is_status(&self, status: u16) -> bool {
        self.as_number() == Some(i64::from(status))
    }

    pub fn is_token(&self, token: &str) -> bool {
        self.as_token() == Some(token)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Numeric(n) => write!(f, "{}", n),
            ErrorCode::Token(token) => f.write_str(token),
        }
    }
}

impl From<u16> for ErrorCode {
    fn from(status: u16) -> Self {
        ErrorCode::Numeric(i64::from(status))
    }
}

impl From<&str> for ErrorCode {
    fn from(token: &str) -> Self {
        ErrorCode::Token(token.to_string())
    }
}

impl From<String> for ErrorCode {
    fn from(token: String) -> Self {
        ErrorCode::Token(token)
    }
}

/// One field-level validation failure as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Title, message and suggested action ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDisplay {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

impl ErrorDisplay {
    /// Message followed by the action on its own line
    pub fn full_message(&self) -> String {
        match &self.action {
            Some(action) => format!("{}\n{}", self.message, action),
            None => self.message.clone(),
        }
    }
}

/// A failed call, classified
///
/// Serializes to `{kind, code, message, detail?, errors?}`. The originating
/// raw failure and the caller's context are kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Validation failures, verbatim from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    #[serde(skip)]
    pub origin: Option<Arc<RawFailure>>,
    #[serde(skip)]
    pub context: Option<LogContext>,
}

impl AppError {
    pub fn new(kind: ErrorKind, code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            detail: None,
            errors: None,
            origin: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Arc<RawFailure>) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    /// HTTP status of the originating response, if there was one
    pub fn status(&self) -> Option<u16> {
        self.origin.as_ref().and_then(|raw| raw.status())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Server)
            || self.code.is_status(429)
            || self.code.is_status(503)
    }

    /// Whether this error should end the session
    pub fn is_auth_error(&self) -> bool {
        self.kind == ErrorKind::Authentication
            || self.code.is_status(401)
            || self.code.is_token("TOKEN_EXPIRED")
            || self.code.is_token("INVALID_TOKEN")
    }

    /// Validation failures that follow the `{field, message, code}` shape
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors
            .as_ref()
            .and_then(|errors| serde_json::from_value(errors.clone()).ok())
            .unwrap_or_default()
    }

    pub fn suggested_action(&self, catalog: &MessageCatalog) -> &'static str {
        catalog.suggested_action(self.kind)
    }

    pub fn display(&self, catalog: &MessageCatalog) -> ErrorDisplay {
        ErrorDisplay {
            title: catalog.display_title(self.kind).to_string(),
            message: self.message.clone(),
            action: Some(self.suggested_action(catalog).to_string()),
        }
    }
}

/// Anything the dispatcher can be asked to surface
#[derive(Debug)]
pub enum Failure {
    /// Already classified, used as is
    Classified(AppError),
    /// Transport outcome not yet classified
    Raw(RawFailure),
    /// A non-HTTP failure raised by the wrapped operation
    Runtime(Box<dyn std::error::Error + Send + Sync>),
}

impl Failure {
    pub fn runtime<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Runtime(Box::new(error))
    }
}

impl From<AppError> for Failure {
    fn from(error: AppError) -> Self {
        Failure::Classified(error)
    }
}

impl From<RawFailure> for Failure {
    fn from(raw: RawFailure) -> Self {
        Failure::Raw(raw)
    }
}

impl From<ClientError> for Failure {
    fn from(error: ClientError) -> Self {
        Failure::runtime(error)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Failure {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Failure::Runtime(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::messages::Locale;
    use serde_json::json;

    #[test]
    fn test_wire_contract() {
        let error = AppError::new(ErrorKind::Validation, "VALIDATION_ERROR", "bad input")
            .with_errors(json!([{"field": "email", "message": "Invalid email format"}]))
            .with_context(LogContext::new().with_field("form", "register"));

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "VALIDATION",
                "code": "VALIDATION_ERROR",
                "message": "bad input",
                "errors": [{"field": "email", "message": "Invalid email format"}]
            })
        );

        let back: AppError = serde_json::from_value(value).unwrap();
        assert_eq!(back.code, ErrorCode::Token("VALIDATION_ERROR".into()));
        assert!(back.context.is_none());
    }

    #[test]
    fn test_numeric_code_serializes_as_number() {
        let error = AppError::new(ErrorKind::Network, ErrorCode::NO_RESPONSE, "offline");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["code"], json!(0));
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::new(ErrorKind::Network, 0u16, "").is_retryable());
        assert!(AppError::new(ErrorKind::Server, 500u16, "").is_retryable());
        assert!(AppError::new(ErrorKind::RateLimit, 429u16, "").is_retryable());
        assert!(!AppError::new(ErrorKind::RateLimit, "RATE_LIMIT_EXCEEDED", "").is_retryable());
        assert!(!AppError::new(ErrorKind::Validation, 400u16, "").is_retryable());
    }

    #[test]
    fn test_auth_error() {
        assert!(AppError::new(ErrorKind::Authentication, "X", "").is_auth_error());
        assert!(AppError::new(ErrorKind::Validation, "TOKEN_EXPIRED", "").is_auth_error());
        assert!(AppError::new(ErrorKind::Server, "INVALID_TOKEN", "").is_auth_error());
        assert!(!AppError::new(ErrorKind::Authorization, 403u16, "").is_auth_error());
    }

    #[test]
    fn test_field_errors() {
        let error = AppError::new(ErrorKind::Validation, 422u16, "invalid").with_errors(json!([
            {"field": "email", "message": "Invalid email format", "code": "INVALID_EMAIL"}
        ]));
        let fields = error.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field.as_deref(), Some("email"));

        let odd = AppError::new(ErrorKind::Validation, 422u16, "invalid")
            .with_errors(json!({"email": "bad"}));
        assert!(odd.field_errors().is_empty());
    }

    #[test]
    fn test_display() {
        let catalog = MessageCatalog::new(Locale::En);
        let error = AppError::new(ErrorKind::Network, 0u16, "offline");
        let display = error.display(&catalog);

        assert_eq!(display.title, "Network error");
        assert_eq!(
            display.full_message(),
            "offline\nPlease check your network connection"
        );
        assert_eq!(error.to_string(), "offline");
    }
}
