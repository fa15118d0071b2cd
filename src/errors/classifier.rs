//! Maps raw failures onto the error taxonomy
//!
//! [`classify`] is the pure mapping. [`ErrorClassifier`] wraps it with the
//! logging every classification gets and handles the non-HTTP entry points.

use super::app_error::{AppError, ErrorCode, Failure};
use super::kind::ErrorKind;
use super::messages::{MessageCatalog, ServerCode};
use crate::core::{LogContext, LogLevel, Logger, REQUEST_ID_KEY};
use crate::http::{HttpResponse, Method, RawFailure, TransportOutcome};
use serde::Deserialize;
use std::sync::Arc;

/// Response bodies longer than this are cut when kept as `detail`
const MAX_DETAIL_LEN: usize = 512;

/// Error body as the backend sends it
///
/// Both `code` and `error_code` name the server token. `detail` may be a
/// string or any JSON value (FastAPI sends lists for validation failures).
#[derive(Debug, Default, Deserialize)]
struct ServerErrorBody {
    #[serde(alias = "error_code")]
    code: Option<ErrorCode>,
    message: Option<String>,
    detail: Option<serde_json::Value>,
    errors: Option<serde_json::Value>,
}

impl ServerErrorBody {
    /// Parse a JSON object body; anything else yields `None`
    fn parse(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<serde_json::Value>(body).ok()? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// A body is structured when it names a code or a message
    fn is_structured(&self) -> bool {
        self.code.is_some() || self.message.is_some()
    }

    fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Classify a raw failure. Total: every input yields exactly one kind.
///
/// ```
/// use rftip_client::errors::{classify, ErrorKind, MessageCatalog};
/// use rftip_client::http::{HttpResponse, Method, RawFailure, TransportOutcome};
///
/// let raw = RawFailure::new(
///     Method::Get,
///     "/tracks/9",
///     TransportOutcome::Response(HttpResponse::new(404)),
/// );
/// let error = classify(&raw, &MessageCatalog::default());
/// assert_eq!(error.kind, ErrorKind::NotFound);
/// ```
pub fn classify(raw: &RawFailure, catalog: &MessageCatalog) -> AppError {
    let error = match &raw.outcome {
        TransportOutcome::Failure { message } => no_response(catalog, message.clone()),
        TransportOutcome::Timeout { after } => no_response(
            catalog,
            format!("timeout of {}ms exceeded", after.as_millis()),
        ),
        TransportOutcome::Response(response) => classify_response(response, catalog),
    };
    error.with_origin(Arc::new(raw.clone()))
}

fn no_response(catalog: &MessageCatalog, detail: String) -> AppError {
    AppError::new(
        ErrorKind::Network,
        ErrorCode::NO_RESPONSE,
        catalog.network_failure(),
    )
    .with_detail(detail)
}

fn classify_response(response: &HttpResponse, catalog: &MessageCatalog) -> AppError {
    let status = response.status;
    let body = ServerErrorBody::parse(&response.body);

    let mut error = match body {
        Some(body) if body.is_structured() => {
            let token = body.code.as_ref().and_then(ErrorCode::as_token);
            let kind = ErrorKind::from_status(status)
                .or_else(|| token.and_then(ErrorKind::from_code_token))
                .unwrap_or(ErrorKind::Unknown);

            let message = token
                .and_then(ServerCode::parse)
                .map(|code| catalog.server_message(code).to_string())
                .or_else(|| body.message.clone().filter(|m| !m.trim().is_empty()))
                .unwrap_or_else(|| catalog.generic_failure().to_string());

            let mut error = AppError::new(
                kind,
                body.code.clone().unwrap_or(ErrorCode::from(status)),
                message,
            );
            error.detail = body.detail_text();
            error.errors = body.errors;
            error
        }
        unstructured => {
            let detail = unstructured
                .and_then(|b| b.detail_text())
                .or_else(|| body_excerpt(response));
            let mut error = match ErrorKind::fixed_for_status(status) {
                Some(kind) => AppError::new(kind, status, catalog.kind_message(kind)),
                None => AppError::new(ErrorKind::Unknown, status, catalog.request_failed(status)),
            };
            error.detail = detail;
            error
        }
    };

    if error.kind == ErrorKind::RateLimit {
        if let Some(retry_after) = response.header("retry-after").map(str::trim) {
            if !retry_after.is_empty() {
                error.message = catalog.rate_limited(retry_after);
            }
        }
    }

    error
}

fn body_excerpt(response: &HttpResponse) -> Option<String> {
    let text = response.text();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.char_indices().nth(MAX_DETAIL_LEN) {
        Some((cut, _)) => Some(format!("{}...", &text[..cut])),
        None => Some(text.to_string()),
    }
}

/// Classifier bound to a logger and a locale
pub struct ErrorClassifier {
    logger: Arc<Logger>,
    catalog: MessageCatalog,
}

impl ErrorClassifier {
    pub fn new(logger: Arc<Logger>, catalog: MessageCatalog) -> Self {
        Self { logger, catalog }
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Classify and log; SERVER and UNKNOWN at ERROR, everything else at WARNING
    pub fn classify(&self, raw: &RawFailure, context: Option<LogContext>) -> AppError {
        let mut error = classify(raw, &self.catalog);
        error.context = context;

        let mut fields = LogContext::new()
            .with_field("kind", error.kind.as_str())
            .with_field("code", error.code.to_string())
            .with_field("method", raw.method.as_str())
            .with_field("url", raw.url.as_str());
        if let Some(status) = raw.status() {
            fields.add_field("status", status);
        }
        if let Some(request_id) = &raw.request_id {
            fields.add_field(REQUEST_ID_KEY, request_id.as_str());
        }
        self.log(&error, fields);
        error
    }

    /// A non-HTTP failure: UNKNOWN with code `RUNTIME_ERROR`
    pub fn classify_runtime(&self, failure: &(dyn std::error::Error + 'static)) -> AppError {
        let text = failure.to_string();
        let message = if text.trim().is_empty() {
            self.catalog.unknown_error().to_string()
        } else {
            text
        };

        let mut chain = Vec::new();
        let mut current = failure.source();
        while let Some(cause) = current {
            chain.push(format!("caused by: {}", cause));
            current = cause.source();
        }

        let mut error = AppError::new(ErrorKind::Unknown, "RUNTIME_ERROR", message);
        if !chain.is_empty() {
            error.detail = Some(chain.join("\n"));
        }
        self.log(&error, LogContext::new().with_field("code", "RUNTIME_ERROR"));
        error
    }

    /// A success response whose body could not be decoded
    pub fn classify_decode(&self, method: Method, url: &str, failure: &serde_json::Error) -> AppError {
        let error = AppError::new(
            ErrorKind::Unknown,
            "INVALID_RESPONSE",
            self.catalog.invalid_response(),
        )
        .with_detail(failure.to_string());

        self.log(
            &error,
            LogContext::new()
                .with_field("code", "INVALID_RESPONSE")
                .with_field("method", method.as_str())
                .with_field("url", url),
        );
        error
    }

    /// Classify whatever the caller has; classified errors pass through untouched
    pub fn resolve(&self, failure: Failure, context: Option<LogContext>) -> AppError {
        if let Some(context) = context.as_ref().filter(|c| !c.is_empty()) {
            self.logger.debug_with_context("Error context", context.clone());
        }

        match failure {
            Failure::Classified(error) => error,
            Failure::Raw(raw) => self.classify(&raw, context),
            Failure::Runtime(boxed) => {
                let mut error = self.classify_runtime(boxed.as_ref());
                error.context = context;
                error
            }
        }
    }

    fn log(&self, error: &AppError, fields: LogContext) {
        let message = format!("API error: {}", error.message);
        match error.kind.log_level() {
            LogLevel::Error => self.logger.error_with_cause(message, error, Some(fields)),
            _ => self.logger.warn_with_context(message, fields),
        }
    }
}
