//! Transport seam between the pipeline and the network

use super::types::{HttpRequest, HttpResponse, Method, RequestBody, TransportOutcome};
use crate::core::{ClientError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Sends a fully prepared request
///
/// `request.url` is absolute and `request.headers` are final. Transports
/// report connection-level failures as [`TransportOutcome::Failure`] and
/// never apply their own call timeout; the pipeline owns that.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> TransportOutcome;

    fn name(&self) -> &str {
        "transport"
    }
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rftip_client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> TransportOutcome {
        let mut builder = self
            .client
            .request(Self::method(request.method), request.url.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            Some(RequestBody::Bytes { data, .. }) => builder.body(data.clone()),
            None => builder,
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return TransportOutcome::failure(e.to_string()),
        };

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        match response.bytes().await {
            Ok(body) => TransportOutcome::Response(HttpResponse {
                status,
                headers,
                body: body.to_vec(),
            }),
            Err(e) => TransportOutcome::failure(format!("failed to read response body: {}", e)),
        }
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

/// In-memory transport that replays scripted outcomes in order
///
/// Every request is recorded. Once the script runs out the fallback outcome
/// is returned, or a transport failure when none is set.
///
/// ```
/// use rftip_client::http::{HttpResponse, ScriptedTransport, TransportOutcome};
/// use std::time::Duration;
///
/// let transport = ScriptedTransport::new()
///     .respond(TransportOutcome::Response(HttpResponse::new(200)))
///     .respond_after(Duration::from_millis(50), TransportOutcome::failure("reset"));
/// assert_eq!(transport.remaining(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<(Duration, TransportOutcome)>>,
    fallback: Option<(Duration, TransportOutcome)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(self, outcome: TransportOutcome) -> Self {
        self.respond_after(Duration::ZERO, outcome)
    }

    /// Queue an outcome delivered after `delay`
    #[must_use]
    pub fn respond_after(self, delay: Duration, outcome: TransportOutcome) -> Self {
        self.script.lock().push_back((delay, outcome));
        self
    }

    /// Outcome for every request beyond the script
    #[must_use]
    pub fn fallback(mut self, delay: Duration, outcome: TransportOutcome) -> Self {
        self.fallback = Some((delay, outcome));
        self
    }

    pub fn push(&self, outcome: TransportOutcome) {
        self.script.lock().push_back((Duration::ZERO, outcome));
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    /// Requests received so far, as prepared by the pipeline
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> TransportOutcome {
        self.requests.lock().push(request.clone());
        let next = self.script.lock().pop_front().or_else(|| self.fallback.clone());

        match next {
            Some((delay, outcome)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => TransportOutcome::failure("no scripted response left"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(ReqwestTransport::method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(ReqwestTransport::method(Method::Head), reqwest::Method::HEAD);
    }

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let transport = ScriptedTransport::new()
            .respond(TransportOutcome::Response(HttpResponse::new(201)))
            .fallback(Duration::ZERO, TransportOutcome::Response(HttpResponse::new(204)));
        let request = HttpRequest::post("http://localhost/api/zones");

        assert_eq!(transport.send(&request).await.status(), 201);
        assert_eq!(transport.send(&request).await.status(), 204);
        assert_eq!(transport.send(&request).await.status(), 204);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_scripted_without_fallback_fails() {
        let transport = ScriptedTransport::new();
        let outcome = transport.send(&HttpRequest::get("/x")).await;
        assert!(matches!(outcome, TransportOutcome::Failure { .. }));
    }

    #[test]
    fn test_new_builds_client() {
        let transport = ReqwestTransport::new().unwrap();
        assert_eq!(transport.name(), "reqwest");
    }
}
