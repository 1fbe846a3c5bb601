//! Upstream client error types.
//!
//! Every failure talking to the ticket service ends up here. Tool handlers
//! turn the recoverable variants into `{"error": ...}` result payloads; only
//! [`UpstreamError::InvalidResponse`] escapes as a tool fault.

use thiserror::Error;

/// Errors that can occur while calling the flight ticket service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Connection refused, DNS failure, reset, or any other transport problem.
    #[error("request failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The service did not answer within the request timeout.
    #[error("request failed: timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Non-2xx status. `payload` holds the decoded JSON body when it parsed.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: u16,
        body: String,
        payload: Option<serde_json::Value>,
    },

    /// A 2xx response whose body is not valid JSON.
    #[error("invalid response body from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

impl UpstreamError {
    /// Whether this error is reported back to the caller as a tool result
    /// (`{"error": ...}`) rather than as a tool execution fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UpstreamError::RequestFailed { .. }
                | UpstreamError::Timeout { .. }
                | UpstreamError::HttpStatus { .. }
        )
    }

    /// The value placed under `"error"` for a non-2xx response.
    ///
    /// The decoded JSON body when there was one, otherwise the
    /// `HTTP <status>: <body>` status line.
    pub fn status_payload(&self) -> Option<serde_json::Value> {
        match self {
            UpstreamError::HttpStatus {
                status,
                body,
                payload,
            } => Some(
                payload
                    .clone()
                    .unwrap_or_else(|| serde_json::Value::String(format!("HTTP {status}: {body}"))),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_payload_prefers_decoded_body() {
        let err = UpstreamError::HttpStatus {
            status: 404,
            body: r#"{"error":"Ticket not found"}"#.to_string(),
            payload: Some(serde_json::json!({"error": "Ticket not found"})),
        };
        assert_eq!(
            err.status_payload(),
            Some(serde_json::json!({"error": "Ticket not found"}))
        );
    }

    #[test]
    fn test_status_payload_falls_back_to_status_line() {
        let err = UpstreamError::HttpStatus {
            status: 502,
            body: "Bad Gateway".to_string(),
            payload: None,
        };
        assert_eq!(
            err.status_payload(),
            Some(serde_json::json!("HTTP 502: Bad Gateway"))
        );
    }

    #[test]
    fn test_status_payload_none_for_transport_errors() {
        let err = UpstreamError::RequestFailed {
            url: "http://localhost:1/health".into(),
            reason: "connection refused".into(),
        };
        assert!(err.status_payload().is_none());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(UpstreamError::Timeout {
            url: "u".into(),
            timeout_secs: 30
        }
        .is_recoverable());
        assert!(UpstreamError::RequestFailed {
            url: "u".into(),
            reason: "r".into()
        }
        .is_recoverable());
        assert!(!UpstreamError::InvalidResponse {
            url: "u".into(),
            reason: "expected value".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_request_failed_display_is_tagged() {
        let err = UpstreamError::RequestFailed {
            url: "http://x/health".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "request failed: connection refused");
    }
}
