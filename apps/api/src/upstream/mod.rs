/// Upstream client: the single point of entry for every call to the store backend
/// (generation, ad library, product catalog, ad platform, brand voice).
///
/// RULE: handlers and workflow code never build HTTP requests themselves.
/// They go through `StudioBackend`, whose HTTP implementation sits on this client.
///
/// Only idempotent GETs are retried. Mutating calls are sent exactly once.
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod backend;
#[cfg(test)]
pub mod fake;

pub use backend::{HttpBackend, StudioBackend};

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 1000;
const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The endpoint answered `{ "success": false, "error": { "message" } }`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Upstream returned no data")]
    EmptyData,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

impl UpstreamError {
    /// Message suitable for a banner: the server-supplied text when there is one,
    /// a generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::Rejected { message } | UpstreamError::Api { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Same as `user_message`, but with a caller-chosen fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            UpstreamError::Rejected { message } | UpstreamError::Api { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Response envelope shared by every upstream endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, UpstreamError> {
        if !self.success {
            return Err(UpstreamError::Rejected {
                message: self.error.map(|e| e.message).unwrap_or_default(),
            });
        }
        self.data.ok_or(UpstreamError::EmptyData)
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// GET a read-only resource.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let mut last_error: Option<UpstreamError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(BASE_BACKOFF_MS * (1 << (attempt - 1)));
                warn!(
                    "GET {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.request(Method::GET, path).query(query).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(UpstreamError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("GET {} returned {}: {}", path, status, body);
                last_error = Some(UpstreamError::Api {
                    status: status.as_u16(),
                    message: error_message(&body, status),
                });
                continue;
            }

            return decode(path, response).await;
        }

        Err(last_error.unwrap_or(UpstreamError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Sends a mutating request exactly once.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path).json(body).send().await?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    debug!("{} answered success={}", path, envelope.success);
    envelope.into_result()
}

/// Pulls `error.message` out of an error body, falling back to the status reason.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|e| e.error)
        .map(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Upstream request failed")
                .to_string()
        })
}
