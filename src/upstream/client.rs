//! HTTP client for the flight ticket service.
//!
//! One method per REST verb the tools need. Each call is a single attempt:
//! no retries, no fallback. Success yields the decoded JSON body; anything
//! else is classified into an [`UpstreamError`].

use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, Url};
use serde::Serialize;

use super::errors::UpstreamError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Base URL used when no override is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080";

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── TicketServiceClient ─────────────────────────────────────────────────────

/// Client for the upstream ticket REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct TicketServiceClient {
    http: HttpClient,
    base_url: Url,
}

impl TicketServiceClient {
    /// Create a client rooted at `base_url`.
    ///
    /// Does NOT check connectivity; that happens on the first request.
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let parsed = Url::parse(base_url).map_err(|e| UpstreamError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".into(),
            });
        }

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─── Verbs ───────────────────────────────────────────────────────────

    /// `GET <base>/<segments...>`
    pub async fn get(&self, segments: &[&str]) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.get(url.clone()), &url).await
    }

    /// `GET <base>/<segments...>?<query>`
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.get(url.clone()).query(query), &url)
            .await
    }

    /// `POST <base>/<segments...>` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.post(url.clone()).json(body), &url).await
    }

    /// `PUT <base>/<segments...>` with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.put(url.clone()).json(body), &url).await
    }

    /// `DELETE <base>/<segments...>`
    pub async fn delete(&self, segments: &[&str]) -> Result<serde_json::Value, UpstreamError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.delete(url.clone()), &url).await
    }

    // ─── Internals ───────────────────────────────────────────────────────

    /// Append path segments to the base URL.
    ///
    /// Segments are percent-encoded, so an identifier containing `/` or `?`
    /// stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry path segments".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a prepared request and classify the outcome.
    async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<serde_json::Value, UpstreamError> {
        tracing::debug!(url = %url, "upstream request");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout {
                    url: url.to_string(),
                    timeout_secs: REQUEST_TIMEOUT.as_secs(),
                }
            } else {
                UpstreamError::RequestFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| UpstreamError::RequestFailed {
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "upstream returned non-success status"
            );
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                payload: serde_json::from_str(&body_text).ok(),
                body: body_text,
            });
        }

        serde_json::from_str(&body_text).map_err(|e| UpstreamError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
