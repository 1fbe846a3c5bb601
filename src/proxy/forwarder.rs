//! Line-oriented stdio → HTTP forwarder.
//!
//! Each input line is parsed as JSON and POSTed unchanged to the remote MCP
//! endpoint; the decoded reply is written back as one line. Failures become
//! synthesized JSON-RPC errors so a single bad line never stops the loop.

use std::time::Duration;

use reqwest::Url;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};

use super::errors::ProxyError;
use crate::jsonrpc::error_codes;
use crate::transport::{read_raw_line, write_message, TransportError};

/// Remote endpoint used when none is configured.
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:8080/mcp";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Proxy ───────────────────────────────────────────────────────────────────

/// Forwards JSON-RPC messages to a fixed remote endpoint.
#[derive(Debug, Clone)]
pub struct ForwardingProxy {
    http: reqwest::Client,
    remote_url: Url,
    timeout: Duration,
}

impl ForwardingProxy {
    pub fn new(remote_url: &str, timeout: Duration) -> Result<Self, ProxyError> {
        let parsed = Url::parse(remote_url).map_err(|e| ProxyError::InvalidRemoteUrl {
            url: remote_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidRemoteUrl {
                url: remote_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            remote_url: parsed,
            timeout,
        })
    }

    pub fn remote_url(&self) -> &Url {
        &self.remote_url
    }

    /// POST `message` to the remote endpoint and decode the reply.
    ///
    /// Returns `Ok(None)` when the remote accepts the message without a body,
    /// as it does for notifications.
    pub async fn forward(&self, message: &Value) -> Result<Option<Value>, ProxyError> {
        let response = self
            .http
            .post(self.remote_url.clone())
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    ProxyError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProxyError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(ProxyError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ProxyError::InvalidResponse {
                reason: e.to_string(),
            })
    }

    /// Handle one input line. `None` means nothing should be written.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        if line.trim().is_empty() {
            return None;
        }

        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unparseable line");
                return Some(error_reply(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        match self.forward(&message).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(remote = %self.remote_url, error = %err, "forwarding failed");
                let id = message.get("id").cloned().unwrap_or(Value::Null);
                Some(error_reply(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("Proxy error: {err}"),
                ))
            }
        }
    }

    /// Forward every line from `reader` until end of input.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ProxyError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        while read_raw_line(&mut reader, &mut buf)
            .await
            .map_err(|e| ProxyError::Io {
                reason: e.to_string(),
            })?
        {
            let reply = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line).await,
                Err(e) => {
                    tracing::warn!(error = %e, "input line is not valid UTF-8");
                    Some(error_reply(
                        Value::Null,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ))
                }
            };

            let Some(reply) = reply else {
                continue;
            };

            match write_message(&mut writer, &reply).await {
                Ok(()) => {}
                Err(TransportError::Closed) => {
                    tracing::info!("stdout closed, stopping");
                    return Ok(());
                }
                Err(e) => {
                    return Err(ProxyError::Io {
                        reason: e.to_string(),
                    })
                }
            }
        }

        tracing::info!("stdin closed, stopping");
        Ok(())
    }
}

fn error_reply(id: Value, code: i32, message: String) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
