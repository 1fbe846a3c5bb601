//! Tool handlers. Each call becomes exactly one upstream REST request.

use serde::de::DeserializeOwned;
use serde_json::json;

use super::errors::ToolError;
use super::registry::ToolKind;
use super::types::{
    CreateTicketArgs, HealthCheckArgs, ListTicketsArgs, TicketIdArgs, UpdateTicketArgs,
};
use crate::upstream::{TicketServiceClient, UpstreamError};

impl ToolKind {
    /// Validate `arguments` and perform the tool's upstream call.
    ///
    /// Network failures and non-2xx statuses come back as `Ok({"error": ...})`.
    /// `Err` is reserved for bad arguments and unusable upstream responses.
    pub async fn invoke(
        self,
        client: &TicketServiceClient,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let outcome = match self {
            ToolKind::HealthCheck => {
                let HealthCheckArgs {} = parse_arguments(self, arguments)?;
                client.get(&["health"]).await
            }
            ToolKind::CreateFlightTicket => {
                let args: CreateTicketArgs = parse_arguments(self, arguments)?;
                client.post(&["ticket"], &args).await
            }
            ToolKind::GetFlightTicket => {
                let args: TicketIdArgs = parse_arguments(self, arguments)?;
                require_id(self, &args.confirmation_id)?;
                client.get(&["ticket", args.confirmation_id.as_str()]).await
            }
            ToolKind::UpdateFlightTicket => {
                let args: UpdateTicketArgs = parse_arguments(self, arguments)?;
                let (confirmation_id, changes) = args.into_parts();
                require_id(self, &confirmation_id)?;
                client.put(&["ticket", confirmation_id.as_str()], &changes).await
            }
            ToolKind::CancelFlightTicket => {
                let args: TicketIdArgs = parse_arguments(self, arguments)?;
                require_id(self, &args.confirmation_id)?;
                client.delete(&["ticket", args.confirmation_id.as_str()]).await
            }
            ToolKind::ListFlightTickets => {
                let args: ListTicketsArgs = parse_arguments(self, arguments)?;
                match args.limit {
                    Some(limit) => {
                        client
                            .get_with_query(&["tickets"], &[("limit", limit)])
                            .await
                    }
                    None => client.get(&["tickets"]).await,
                }
            }
        };

        into_tool_result(self, outcome)
    }
}

/// Deserialize `arguments` into the tool's input type. `null` counts as `{}`.
fn parse_arguments<T: DeserializeOwned>(
    tool: ToolKind,
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };

    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.name().to_string(),
        reason: e.to_string(),
    })
}

fn require_id(tool: ToolKind, confirmation_id: &str) -> Result<(), ToolError> {
    if confirmation_id.trim().is_empty() {
        return Err(ToolError::InvalidArguments {
            tool: tool.name().to_string(),
            reason: "confirmation_id must not be empty".into(),
        });
    }
    Ok(())
}

/// Fold recoverable upstream failures into the result payload.
fn into_tool_result(
    tool: ToolKind,
    outcome: Result<serde_json::Value, UpstreamError>,
) -> Result<serde_json::Value, ToolError> {
    let err = match outcome {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if let Some(payload) = err.status_payload() {
        return Ok(json!({ "error": payload }));
    }

    if err.is_recoverable() {
        tracing::warn!(tool = tool.name(), error = %err, "upstream call failed");
        return Ok(json!({ "error": format!("{}: {err}", tool.failure_context()) }));
    }

    Err(ToolError::ExecutionFailed {
        tool: tool.name().to_string(),
        reason: err.to_string(),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
