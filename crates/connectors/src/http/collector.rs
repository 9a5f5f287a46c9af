use crate::http::error::TransmitError;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT_PATH: &str = "/services/collector/raw";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const CHANNEL_HEADER: HeaderName = HeaderName::from_static("x-splunk-request-channel");

/// Where and how event payloads are posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default)]
    pub base_address: String,

    #[serde(default)]
    pub token: String,

    /// Sent as the request channel; raw ingestion requires one.
    #[serde(default)]
    pub client_id: String,

    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Accept any server certificate.
    #[serde(default)]
    pub ignore_ssl_errors: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            base_address: String::new(),
            token: String::new(),
            client_id: String::new(),
            endpoint_path: default_endpoint_path(),
            ignore_ssl_errors: false,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CollectorConfig {
    pub fn endpoint(&self) -> Result<String, TransmitError> {
        let base = self.base_address.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(TransmitError::MissingBaseAddress);
        }

        let path = self.endpoint_path.trim();
        if path.is_empty() {
            Ok(base.to_string())
        } else if path.starts_with('/') {
            Ok(format!("{base}{path}"))
        } else {
            Ok(format!("{base}/{path}"))
        }
    }
}

fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// HTTP event collector client. One request per payload, never retried here.
#[derive(Clone)]
pub struct HttpCollector {
    client: Client,
    endpoint: String,
}

impl HttpCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self, TransmitError> {
        let endpoint = config.endpoint()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Splunk {}", config.token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        if !config.client_id.is_empty() {
            headers.insert(CHANNEL_HEADER, HeaderValue::from_str(&config.client_id)?);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms));

        if config.ignore_ssl_errors {
            warn!(%endpoint, "Certificate validation disabled for collector");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(HttpCollector {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `payload` and returns the response status, successful or not.
    /// Only transport faults are errors.
    pub async fn send(&self, payload: String) -> Result<StatusCode, TransmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), %body, "Collector response");
        }

        Ok(status)
    }
}
