//! Forwarding proxy: stdin JSON-RPC lines relayed to a remote HTTP MCP server.
//!
//! Lets a stdio-only MCP client talk to a server deployed behind the HTTP
//! transport. Messages are forwarded unchanged; only failures are synthesized.

pub mod errors;
pub mod forwarder;

// Re-exports for convenience
pub use errors::ProxyError;
pub use forwarder::{ForwardingProxy, DEFAULT_REMOTE_URL, DEFAULT_TIMEOUT};
