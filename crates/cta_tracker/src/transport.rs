//! HTTP transport
//!
//! The trackers never talk to reqwest directly. They build an [`ApiRequest`]
//! and hand it to a [`Transport`] (async) or [`BlockingTransport`]. Both
//! reqwest implementations decode the body through the same function, so
//! they return identical values for identical responses.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::params::QueryParams;

/// A fully assembled GET request: endpoint URL plus query parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    url: String,
    query: QueryParams,
}

impl ApiRequest {
    /// Create a request for `url` with the given query parameters
    pub fn new(url: impl Into<String>, query: QueryParams) -> Self {
        Self {
            url: url.into(),
            query,
        }
    }

    /// Endpoint URL without query string
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters, including the API key
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Last path segment of the URL (e.g. `getpredictions`)
    pub fn endpoint(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(name, value)| (name, if name == "key" { "[REDACTED]" } else { value }))
            .collect();

        f.debug_struct("ApiRequest")
            .field("url", &self.url)
            .field("query", &query)
            .finish()
    }
}

/// Non-blocking transport: suspends the calling task until the response arrives
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET request and decode the JSON body
    async fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError>;
}

/// Blocking transport: runs the request to completion on the calling thread
#[cfg_attr(test, automock)]
pub trait BlockingTransport: Send + Sync {
    /// Issue one GET request and decode the JSON body
    fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError>;
}

/// reqwest-backed [`Transport`]
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create an async transport from the tracker configuration
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TrackerError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
    async fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError> {
        debug!(?request, "Sending tracker request");

        let response = self
            .client
            .get(request.url())
            .query(request.query().as_slice())
            .send()
            .await
            .map_err(|e| map_send_error(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_send_error(&e, self.timeout_secs))?;

        decode_body(&body)
    }
}

/// reqwest-backed [`BlockingTransport`]
///
/// Must not be created, used or dropped inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl BlockingHttpTransport {
    /// Create a blocking transport from the tracker configuration
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TrackerError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

impl BlockingTransport for BlockingHttpTransport {
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint()))]
    fn get(&self, request: &ApiRequest) -> Result<Value, TrackerError> {
        debug!(?request, "Sending tracker request");

        let response = self
            .client
            .get(request.url())
            .query(request.query().as_slice())
            .send()
            .map_err(|e| map_send_error(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| map_send_error(&e, self.timeout_secs))?;

        decode_body(&body)
    }
}

fn map_send_error(err: &reqwest::Error, timeout_secs: u64) -> TrackerError {
    if err.is_timeout() {
        TrackerError::Timeout { timeout_secs }
    } else {
        TrackerError::ConnectionFailed(err.to_string())
    }
}

/// Decode a response body into JSON
pub(crate) fn decode_body(body: &[u8]) -> Result<Value, TrackerError> {
    serde_json::from_slice(body).map_err(|e| TrackerError::Decode(e.to_string()))
}

/// Join a base URL and an endpoint path with exactly one slash
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_body() {
        let value = decode_body(br#"{"bustime-response": {"tm": "20250717 22:47:33"}}"#).unwrap();
        assert_eq!(value["bustime-response"]["tm"], json!("20250717 22:47:33"));
    }

    #[test]
    fn test_decode_malformed_body() {
        assert!(matches!(
            decode_body(b"<html>Service Unavailable</html>"),
            Err(TrackerError::Decode(_))
        ));
        assert!(matches!(decode_body(b""), Err(TrackerError::Decode(_))));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://ctabustracker.com/bustime/api/v3", "getroutes"),
            "https://ctabustracker.com/bustime/api/v3/getroutes"
        );
        assert_eq!(
            endpoint_url("http://localhost:9000/", "ttarrivals.aspx"),
            "http://localhost:9000/ttarrivals.aspx"
        );
    }

    #[test]
    fn test_request_debug_redacts_key() {
        let mut query = QueryParams::new();
        query.push("key", "very-secret");
        query.push("rt", "22");
        let request = ApiRequest::new("http://localhost/getvehicles", query);

        let debug = format!("{request:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("22"));
        assert_eq!(request.endpoint(), "getvehicles");
    }

    #[test]
    fn test_http_transports_build() {
        let config = TrackerConfig::for_testing();
        assert!(HttpTransport::new(&config).is_ok());
    }
}
