//! HTTP transport.
//!
//! A thin wrapper over `reqwest` that carries the provider credential on
//! every request and maps non-success statuses into typed errors. No
//! retries happen at this layer; failures propagate to the caller, which
//! decides how far the damage spreads (one file, one game, or the whole
//! request).

pub mod decode;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub use decode::{decode, DecodeError, DecodedPayload};

/// Header carrying the provider credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Missing API credential: set grid.api_key or GRID_API_KEY")]
    MissingCredential,
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Provider API key, sent as `x-api-key` on every request.
    pub api_key: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rift-agent/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A raw HTTP response body plus its declared content type.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Run the payload decoder over this response.
    pub fn decode(&self) -> Result<DecodedPayload, DecodeError> {
        decode(self.content_type.as_deref(), &self.body)
    }
}

/// HTTP fetcher with the provider credential baked in.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        if config.api_key.is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_key)
                .map_err(|_| FetchError::InvalidUrl("API key is not a valid header".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// GET a URL, returning the body plus content type.
    /// Non-success statuses map to `FetchError::HttpStatus`.
    pub async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { content_type, body })
    }

    /// GET a URL and deserialize a JSON body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, FetchError> {
        let raw = self.get(url).await?;
        Ok(serde_json::from_slice(&raw.body)?)
    }

    /// POST a GraphQL query and return the `data` value.
    ///
    /// A response carrying `errors` maps to `FetchError::Graphql` with the
    /// messages joined; callers deserialize `data` into their typed shape.
    pub async fn post_graphql(
        &self,
        url: &Url,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        debug!(%url, "POST graphql");
        let response = self
            .client
            .post(url.as_str())
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let envelope: serde_json::Value = response.json().await?;

        if let Some(errors) = envelope.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or("unknown error")
                            .to_string()
                    })
                    .collect();
                return Err(FetchError::Graphql(messages.join("; ")));
            }
        }

        match envelope.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(FetchError::Graphql("response carried no data".to_string())),
        }
    }
}

/// Parse an endpoint string into a `Url` with a fetch-flavored error.
pub fn parse_url(s: &str) -> Result<Url, FetchError> {
    Url::parse(s).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", s, e)))
}
