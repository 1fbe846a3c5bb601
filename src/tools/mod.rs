//! Flight ticket tools exposed over MCP.
//!
//! This module handles:
//! - The fixed set of tools and their JSON Schema descriptors
//! - Typed validation of `tools/call` arguments
//! - Translating each call into a single upstream REST request
//!
//! The JSON-RPC dispatcher resolves a tool name once through
//! [`ToolKind::resolve`] and then works with [`ToolKind`] only.

pub mod errors;
pub mod handlers;
pub mod registry;
pub mod types;

// Re-exports for convenience
pub use errors::ToolError;
pub use registry::{ToolDescriptor, ToolKind};
pub use types::{TicketChanges, TicketStatus};
