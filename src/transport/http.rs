//! HTTP transport.
//!
//! Routes:
//! - `POST /mcp`: one JSON-RPC message per request body
//! - `OPTIONS /mcp`: CORS preflight
//! - `GET /health`: liveness payload
//!
//! Every response carries permissive CORS headers. Only `POST /mcp` resolves a
//! session and answers with `x-session-id`; browsers send preflights without
//! custom headers, so `OPTIONS /mcp` and `GET /health` never mint one.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::SecondsFormat;
use tower_http::trace::TraceLayer;

use super::session::{Clock, SessionStore, SystemClock};
use super::{shutdown_signal, TransportError};
use crate::jsonrpc::dispatcher::is_malformed;
use crate::jsonrpc::{Dispatcher, JsonRpcError, JsonRpcResponse};

/// Request/response header carrying the session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Service name reported by `GET /health`.
pub const SERVICE_NAME: &str = "flight-ticket-tools";

const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct HttpState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: Arc<SessionStore>,
    pub environment: String,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    pub fn new(dispatcher: Dispatcher, environment: impl Into<String>) -> Self {
        Self::with_clock(dispatcher, environment, Arc::new(SystemClock))
    }

    /// State whose session table and health timestamp read from `clock`.
    pub fn with_clock(
        dispatcher: Dispatcher,
        environment: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            sessions: Arc::new(SessionStore::new(Arc::clone(&clock))),
            environment: environment.into(),
            clock,
        }
    }
}

// ─── Server ──────────────────────────────────────────────────────────────────

/// Build the router for the HTTP transport.
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp).options(preflight))
        .route("/health", get(health))
        .layer(middleware::map_response(add_cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `addr` until a shutdown signal arrives.
pub async fn serve_http(addr: SocketAddr, state: HttpState) -> Result<(), TransportError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(addr = %addr, "HTTP transport listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TransportError::Io {
            channel: "http",
            reason: e.to_string(),
        })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn handle_mcp(State(st): State<HttpState>, headers: HeaderMap, body: Bytes) -> Response {
    let session = st.sessions.resolve(header_str(&headers, SESSION_HEADER));
    if session.resumed {
        tracing::debug!(
            session_id = %session.id,
            created_at = %session.created_at,
            "session resumed"
        );
    } else {
        tracing::info!(session_id = %session.id, "new session");
    }

    let reply = match std::str::from_utf8(&body) {
        Ok(text) => st.dispatcher.handle_message(text).await,
        Err(_) => Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error())),
    };

    let mut response = match reply {
        None => StatusCode::ACCEPTED.into_response(),
        Some(reply) => {
            let status = if is_malformed(&reply) {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (status, Json(reply)).into_response()
        }
    };

    match HeaderValue::from_str(&session.id) {
        Ok(value) => {
            response.headers_mut().insert(SESSION_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "session id is not a valid header value"),
    }
    response
}

async fn preflight() -> Response {
    (
        StatusCode::OK,
        [(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        )],
    )
        .into_response()
}

async fn health(State(st): State<HttpState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": st.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "environment": st.environment,
    }))
}

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, x-session-id"),
    );
    response
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
