//! Tool error types.

use thiserror::Error;

/// Errors raised while resolving or executing a tool.
///
/// Upstream failures the caller should see as data (network errors, non-2xx
/// statuses) never become a `ToolError`; they are folded into the tool's
/// `{"error": ...}` result instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Arguments did not match the tool's input type.
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The handler could not produce a result.
    #[error("'{tool}' failed: {reason}")]
    ExecutionFailed { tool: String, reason: String },
}
