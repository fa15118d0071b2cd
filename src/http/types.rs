//! Request, response and transport outcome types

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Request header carrying the per-call id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing payload; the pipeline derives `Content-Type` from the variant
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Bytes {
        content_type: String,
        data: Vec<u8>,
    },
}

impl RequestBody {
    pub fn content_type(&self) -> &str {
        match self {
            RequestBody::Json(_) => "application/json",
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
            RequestBody::Bytes { content_type, .. } => content_type,
        }
    }
}

/// How the caller intends to read the response body
///
/// The pipeline turns a non-JSON format into an `Accept` header unless the
/// request already carries one. `Json` leaves the configured default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
    Bytes,
}

impl ResponseFormat {
    /// `Accept` value sent for this format, `None` for the pipeline default
    pub fn accept(self) -> Option<&'static str> {
        match self {
            ResponseFormat::Json => None,
            ResponseFormat::Text => Some("text/plain"),
            ResponseFormat::Bytes => Some("application/octet-stream"),
        }
    }
}

/// A call as issued by a caller, before the pipeline adds metadata
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the API base URL, or an absolute URL
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
    pub response_format: ResponseFormat,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            response_format: ResponseFormat::default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    #[must_use]
    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes {
            content_type: content_type.into(),
            data,
        });
        self
    }

    #[must_use]
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Header lookup ignoring ASCII case
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as returned by the transport, body untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lowercase
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        let body = value.to_string();
        self.with_header("content-type", "application/json")
            .with_body(body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// What the transport produced for one call
#[derive(Debug, Clone, PartialEq)]
pub enum TransportOutcome {
    /// Any HTTP response, success or not
    Response(HttpResponse),
    /// No response: connection refused, DNS, TLS, reset
    Failure { message: String },
    /// No response within the call timeout
    Timeout { after: Duration },
}

impl TransportOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        TransportOutcome::Failure {
            message: message.into(),
        }
    }

    /// Status code, 0 when there was no response
    pub fn status(&self) -> u16 {
        match self {
            TransportOutcome::Response(response) => response.status,
            _ => 0,
        }
    }
}

/// A failed call as handed to the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct RawFailure {
    pub method: Method,
    pub url: String,
    pub request_id: Option<String>,
    pub outcome: TransportOutcome,
}

impl RawFailure {
    pub fn new(method: Method, url: impl Into<String>, outcome: TransportOutcome) -> Self {
        Self {
            method,
            url: url.into(),
            request_id: None,
            outcome,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match &self.outcome {
            TransportOutcome::Response(response) => Some(response),
            _ => None,
        }
    }

    /// HTTP status, `None` when no response arrived
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

/// Per-call tracing data, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMetadata {
    pub request_id: u64,
    pub start_time: Instant,
}

impl RequestMetadata {
    pub fn new(request_id: u64) -> Self {
        Self {
            request_id,
            start_time: Instant::now(),
        }
    }

    /// Header form of the id, `req_<n>`
    pub fn request_id_header(&self) -> String {
        format!("req_{}", self.request_id)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::get("/tracks")
            .query("page", 2)
            .header("Accept-Language", "zh-CN")
            .response_format(ResponseFormat::Text);

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.header_value("accept-language"), Some("zh-CN"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_body_content_types() {
        let json_req = HttpRequest::post("/zones").json(json!({"name": "A"}));
        let form_req = HttpRequest::post("/auth/login").form([("username", "admin")]);
        let raw_req = HttpRequest::post("/files").bytes("text/csv", b"a,b".to_vec());

        assert_eq!(json_req.body.unwrap().content_type(), "application/json");
        assert_eq!(
            form_req.body.unwrap().content_type(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(raw_req.body.unwrap().content_type(), "text/csv");
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(429)
            .with_header("Retry-After", "30")
            .with_json(&json!({"message": "slow down"}));

        assert!(!response.is_success());
        assert_eq!(response.header("retry-after"), Some("30"));
        assert_eq!(response.header("RETRY-AFTER"), Some("30"));
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["message"], "slow down");
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(TransportOutcome::failure("refused").status(), 0);
        assert_eq!(
            TransportOutcome::Timeout {
                after: Duration::from_secs(30)
            }
            .status(),
            0
        );
        let raw = RawFailure::new(
            Method::Get,
            "/x",
            TransportOutcome::Response(HttpResponse::new(404)),
        );
        assert_eq!(raw.status(), Some(404));
    }

    #[test]
    fn test_request_id_header() {
        let metadata = RequestMetadata::new(7);
        assert_eq!(metadata.request_id_header(), "req_7");
    }
}
