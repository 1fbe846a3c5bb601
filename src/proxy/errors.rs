//! Error types for the forwarding proxy.

/// Failures while forwarding a message to the remote MCP endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid remote URL '{url}': {reason}")]
    InvalidRemoteUrl { url: String, reason: String },

    #[error("request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid response from remote: {reason}")]
    InvalidResponse { reason: String },

    #[error("I/O error: {reason}")]
    Io { reason: String },
}

// ─── Tests ───────────────────────────────────────────────────────────────────
