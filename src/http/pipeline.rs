//! Request pipeline: metadata on the way out, timing, logging and
//! classification on the way back
//!
//! Each call moves ISSUED → IN_FLIGHT → SUCCEEDED | FAILED. Failures are
//! always returned to the caller; the only recovery performed here is the
//! forced logout on an authentication failure.

use super::credentials::CredentialStore;
use super::navigation::{redirect_to_login, Navigator, DEFAULT_LOGIN_PATH};
use super::transport::Transport;
use super::types::{
    HttpRequest, HttpResponse, RawFailure, RequestMetadata, TransportOutcome, REQUEST_ID_HEADER,
};
use crate::core::{ClientError, LogContext, Logger, Result, REQUEST_ID_KEY};
use crate::errors::{AppError, ErrorClassifier, ErrorKind, MessageCatalog};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_SLOW_RESPONSE_MS: u64 = 2_000;

/// Shared by every pipeline so request ids never repeat within the process
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix for relative request URLs
    pub base_url: String,
    /// Whole-call timeout; expiry is reported as a NETWORK failure
    pub timeout_ms: u64,
    /// Successful calls slower than this get an extra WARNING entry
    pub slow_response_ms: u64,
    pub login_path: String,
    /// Sent with every request unless the request sets the same header
    pub default_headers: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            slow_response_ms: DEFAULT_SLOW_RESPONSE_MS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_headers,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_slow_response_threshold(mut self, threshold: Duration) -> Self {
        self.slow_response_ms = threshold.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn slow_response_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_response_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ClientError::config("PipelineConfig", format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::config(
                "PipelineConfig",
                format!("base_url must use http or https, got '{}'", url.scheme()),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::config(
                "PipelineConfig",
                "timeout_ms must be greater than zero",
            ));
        }
        if !self.login_path.starts_with('/') {
            return Err(ClientError::config(
                "PipelineConfig",
                "login_path must start with '/'",
            ));
        }
        Ok(())
    }
}

/// Wraps every outbound call
pub struct HttpPipeline {
    config: PipelineConfig,
    transport: Arc<dyn Transport>,
    logger: Arc<Logger>,
    classifier: ErrorClassifier,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl HttpPipeline {
    pub fn new(
        config: PipelineConfig,
        transport: Arc<dyn Transport>,
        logger: Arc<Logger>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        catalog: MessageCatalog,
    ) -> Self {
        Self {
            config,
            classifier: ErrorClassifier::new(logger.clone(), catalog),
            transport,
            logger,
            credentials,
            navigator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Allocate the next request id; never repeats within the process
    pub fn allocate_metadata(&self) -> RequestMetadata {
        RequestMetadata::new(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Join a relative URL onto the base URL; absolute URLs pass through
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    fn prepare(&self, request: &HttpRequest, request_id: &str) -> HttpRequest {
        let mut prepared = request.clone();
        prepared.url = self.resolve_url(&request.url);

        if let Some(accept) = request.response_format.accept() {
            if prepared.header_value("Accept").is_none() {
                prepared.headers.insert("Accept".to_string(), accept.to_string());
            }
        }
        for (name, value) in &self.config.default_headers {
            if prepared.header_value(name).is_none() {
                prepared.headers.insert(name.clone(), value.clone());
            }
        }
        if let Some(body) = &request.body {
            if prepared.header_value("Content-Type").is_none() {
                prepared
                    .headers
                    .insert("Content-Type".to_string(), body.content_type().to_string());
            }
        }
        if let Some(token) = self.credentials.token() {
            prepared
                .headers
                .insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        prepared
            .headers
            .insert(REQUEST_ID_HEADER.to_string(), request_id.to_string());
        prepared
    }

    /// Issue a call and return the raw response on 2xx
    pub async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, AppError> {
        let metadata = self.allocate_metadata();
        let request_id = metadata.request_id_header();
        let method = request.method;
        let url = request.url.clone();
        let prepared = self.prepare(&request, &request_id);

        let mut request_context = LogContext::new()
            .with_field(REQUEST_ID_KEY, request_id.as_str())
            .with_field("hasData", request.body.is_some());
        if !request.query.is_empty() {
            let params: serde_json::Map<String, serde_json::Value> = request
                .query
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            request_context.add_field("params", serde_json::Value::Object(params));
        }
        self.logger.api_request(method.as_str(), &url, request_context);

        let timeout = self.config.timeout();
        let outcome = match tokio::time::timeout(timeout, self.transport.send(&prepared)).await {
            Ok(outcome) => outcome,
            Err(_) => TransportOutcome::Timeout { after: timeout },
        };
        let duration = metadata.elapsed();

        self.logger.api_response(
            method.as_str(),
            &url,
            outcome.status(),
            duration,
            LogContext::new().with_field(REQUEST_ID_KEY, request_id.as_str()),
        );

        match outcome {
            TransportOutcome::Response(response) if response.is_success() => {
                if duration > self.config.slow_response_threshold() {
                    let duration_ms = duration.as_millis() as u64;
                    self.logger.warn_with_context(
                        format!("Slow API response: {} ({}ms)", url, duration_ms),
                        LogContext::new()
                            .with_field(REQUEST_ID_KEY, request_id.as_str())
                            .with_field("url", url.as_str())
                            .with_field("durationMs", duration_ms),
                    );
                }
                Ok(response)
            }
            outcome => {
                let raw = RawFailure::new(method, url, outcome).with_request_id(request_id);
                let error = self.classifier.classify(&raw, None);
                if error.kind == ErrorKind::Authentication {
                    self.force_logout(&raw);
                }
                Err(error)
            }
        }
    }

    fn force_logout(&self, raw: &RawFailure) {
        let mut context = LogContext::new().with_field("url", raw.url.as_str());
        if let Some(request_id) = &raw.request_id {
            context.add_field(REQUEST_ID_KEY, request_id.as_str());
        }
        self.logger
            .warn_with_context("Authentication failed - clearing auth state", context);

        self.credentials.clear();
        redirect_to_login(self.navigator.as_ref(), &self.config.login_path);
    }

    /// Issue a call and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<T, AppError> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|e| self.classifier.classify_decode(method, &url, &e))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, AppError> {
        self.send_json(HttpRequest::get(url)).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> std::result::Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post(url).json(self.encode(url, body)?);
        self.send_json(request).await
    }

    pub async fn put_json<B, T>(&self, url: &str, body: &B) -> std::result::Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::put(url).json(self.encode(url, body)?);
        self.send_json(request).await
    }

    pub async fn patch_json<B, T>(&self, url: &str, body: &B) -> std::result::Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::patch(url).json(self.encode(url, body)?);
        self.send_json(request).await
    }

    /// DELETE, ignoring any response body
    pub async fn delete(&self, url: &str) -> std::result::Result<(), AppError> {
        self.send(HttpRequest::delete(url)).await.map(|_| ())
    }

    fn encode<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> std::result::Result<serde_json::Value, AppError> {
        serde_json::to_value(body).map_err(|e| {
            let error = ClientError::from(e);
            let mut classified = self.classifier.classify_runtime(&error);
            classified.context = Some(LogContext::new().with_field("url", url));
            classified
        })
    }
}

impl std::fmt::Debug for HttpPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPipeline")
            .field("base_url", &self.config.base_url)
            .field("transport", &self.transport.name())
            .finish()
    }
}
