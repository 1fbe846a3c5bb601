//! JSON-RPC 2.0 / MCP request handling.
//!
//! This module handles:
//! - Wire types for requests, responses and errors
//! - Parsing raw messages with the standard error codes
//! - Routing `initialize`, `tools/list`, `tools/call` and `ping`

pub mod dispatcher;
pub mod types;

// Re-exports for convenience
pub use dispatcher::{Dispatcher, PROTOCOL_VERSION, SERVER_NAME};
pub use types::{error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
