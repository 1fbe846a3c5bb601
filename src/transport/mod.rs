//! Transports that carry JSON-RPC messages to the [`Dispatcher`].
//!
//! - [`stdio`]: newline-delimited JSON over stdin/stdout
//! - [`http`]: `POST /mcp` with session ids and CORS headers
//! - [`session`]: the HTTP session table
//!
//! [`Dispatcher`]: crate::jsonrpc::Dispatcher

pub mod http;
pub mod session;
pub mod stdio;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

// Re-exports for convenience
pub use http::{router, serve_http, HttpState};
pub use session::{Clock, Session, SessionStore, SystemClock};
pub use stdio::{run_stdio, serve};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Errors raised while moving messages on or off the wire.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer closed its end of the output stream.
    #[error("output stream closed")]
    Closed,

    #[error("I/O error on {channel}: {reason}")]
    Io {
        channel: &'static str,
        reason: String,
    },

    #[error("failed to encode message: {reason}")]
    Encode { reason: String },

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

// ─── Line I/O ────────────────────────────────────────────────────────────────

/// Read one `\n`-terminated line into `buf` as raw bytes, replacing its
/// previous contents. Returns `false` at end of input.
///
/// Bytes are not decoded here, so a line that is not UTF-8 reaches the
/// caller instead of failing the read.
pub async fn read_raw_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<bool, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let read = reader
        .read_until(b'\n', buf)
        .await
        .map_err(|e| TransportError::Io {
            channel: "stdin",
            reason: e.to_string(),
        })?;
    Ok(read > 0)
}

/// Write `message` as one JSON line and flush.
///
/// A broken pipe maps to [`TransportError::Closed`] so callers can stop
/// without treating it as a failure.
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_string(message).map_err(|e| TransportError::Encode {
        reason: e.to_string(),
    })?;
    line.push('\n');

    writer
        .write_all(line.as_bytes())
        .await
        .map_err(output_error)?;
    writer.flush().await.map_err(output_error)
}

fn output_error(e: std::io::Error) -> TransportError {
    if e.kind() == std::io::ErrorKind::BrokenPipe {
        TransportError::Closed
    } else {
        TransportError::Io {
            channel: "stdout",
            reason: e.to_string(),
        }
    }
}

// ─── Shutdown ────────────────────────────────────────────────────────────────

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping");
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Writer whose reader end has gone away.
    struct ClosedPipe;

    impl AsyncWrite for ClosedPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_write_message_appends_newline() {
        let mut out: Vec<u8> = Vec::new();
        write_message(&mut out, &serde_json::json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(out, b"{\"a\":1}\n");
    }

    #[tokio::test]
    async fn test_read_raw_line_keeps_invalid_bytes() {
        let mut input: &[u8] = b"\xff\xfe\nnext";
        let mut buf = Vec::new();

        assert!(read_raw_line(&mut input, &mut buf).await.unwrap());
        assert_eq!(buf, b"\xff\xfe\n");
        assert!(read_raw_line(&mut input, &mut buf).await.unwrap());
        assert_eq!(buf, b"next");
        assert!(!read_raw_line(&mut input, &mut buf).await.unwrap());
    }

    #[tokio::test]
    async fn test_broken_pipe_is_closed() {
        let err = write_message(&mut ClosedPipe, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
