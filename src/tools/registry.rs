//! The six ticket tools and their descriptors.
//!
//! Provides:
//! - [`ToolKind`], one variant per tool, so handler dispatch is an exhaustive match
//! - Name lookup at the protocol boundary
//! - The MCP descriptors (`name`, `description`, `inputSchema`) served by `tools/list`

use serde::Serialize;
use serde_json::json;

use super::errors::ToolError;

// ─── ToolKind ────────────────────────────────────────────────────────────────

/// Every tool this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    HealthCheck,
    CreateFlightTicket,
    GetFlightTicket,
    UpdateFlightTicket,
    CancelFlightTicket,
    ListFlightTickets,
}

impl ToolKind {
    /// All tools, in the order `tools/list` reports them.
    pub const ALL: [ToolKind; 6] = [
        ToolKind::HealthCheck,
        ToolKind::CreateFlightTicket,
        ToolKind::GetFlightTicket,
        ToolKind::UpdateFlightTicket,
        ToolKind::CancelFlightTicket,
        ToolKind::ListFlightTickets,
    ];

    /// Wire name used in `tools/call`.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::HealthCheck => "health_check",
            ToolKind::CreateFlightTicket => "create_flight_ticket",
            ToolKind::GetFlightTicket => "get_flight_ticket",
            ToolKind::UpdateFlightTicket => "update_flight_ticket",
            ToolKind::CancelFlightTicket => "cancel_flight_ticket",
            ToolKind::ListFlightTickets => "list_flight_tickets",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Resolve a `tools/call` name, the only place an unknown name can appear.
    pub fn resolve(name: &str) -> Result<Self, ToolError> {
        Self::from_name(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })
    }

    /// Descriptors for every tool, in `tools/list` order.
    pub fn descriptors() -> Vec<ToolDescriptor> {
        Self::ALL.into_iter().map(ToolKind::descriptor).collect()
    }

    /// Human-readable description shown to the calling agent.
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::HealthCheck => {
                "Check the health status of the Flight Ticket Service. Returns service \
                 health information including status, service name, version, and timestamp."
            }
            ToolKind::CreateFlightTicket => {
                "Create a new flight ticket with the provided details. Returns the created \
                 flight ticket information or error details."
            }
            ToolKind::GetFlightTicket => {
                "Retrieve a flight ticket using its confirmation ID. Returns the flight \
                 ticket information or error details."
            }
            ToolKind::UpdateFlightTicket => {
                "Update an existing flight ticket with new information. Only the fields \
                 provided are changed. Returns the updated flight ticket or error details."
            }
            ToolKind::CancelFlightTicket => {
                "Cancel (soft delete) a flight ticket by setting its status to CANCELLED. \
                 Returns a success message and the confirmation ID or error details."
            }
            ToolKind::ListFlightTickets => {
                "Retrieve a list of all flight tickets with optional pagination. Returns \
                 the list of tickets with a count or error details."
            }
        }
    }

    /// Phrase prefixed to network failures in this tool's `{"error": ...}` result.
    pub fn failure_context(self) -> &'static str {
        match self {
            ToolKind::HealthCheck => "Failed to check health",
            ToolKind::CreateFlightTicket => "Failed to create ticket",
            ToolKind::GetFlightTicket => "Failed to get ticket",
            ToolKind::UpdateFlightTicket => "Failed to update ticket",
            ToolKind::CancelFlightTicket => "Failed to cancel ticket",
            ToolKind::ListFlightTickets => "Failed to list tickets",
        }
    }

    /// JSON Schema for the tool's `arguments` object.
    ///
    /// Kept in step with the argument structs in [`super::types`].
    pub fn input_schema(self) -> serde_json::Value {
        match self {
            ToolKind::HealthCheck => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            ToolKind::CreateFlightTicket => json!({
                "type": "object",
                "properties": {
                    "origin": {"type": "string", "description": "Origin airport code (e.g., 'JFK')"},
                    "destination": {"type": "string", "description": "Destination airport code (e.g., 'LAX')"},
                    "departure_date": {"type": "string", "description": "Departure date in YYYY-MM-DD format (e.g., '2024-12-25')"},
                    "departure_time": {"type": "string", "description": "Departure time in HH:MM format (e.g., '14:30')"},
                    "passengers": {"type": "integer", "minimum": 1, "description": "Number of passengers (minimum 1)"},
                    "flight_number": {"type": "string", "description": "Flight number (e.g., 'AA1234') - optional"}
                },
                "required": ["origin", "destination", "departure_date", "departure_time", "passengers"]
            }),
            ToolKind::GetFlightTicket => json!({
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID (e.g., 'ABC123')"}
                },
                "required": ["confirmation_id"]
            }),
            ToolKind::UpdateFlightTicket => json!({
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID (e.g., 'ABC123')"},
                    "origin": {"type": "string", "description": "New origin airport code - optional"},
                    "destination": {"type": "string", "description": "New destination airport code - optional"},
                    "departure_date": {"type": "string", "description": "New departure date in YYYY-MM-DD format - optional"},
                    "departure_time": {"type": "string", "description": "New departure time in HH:MM format - optional"},
                    "passengers": {"type": "integer", "minimum": 1, "description": "New number of passengers - optional"},
                    "flight_number": {"type": "string", "description": "New flight number - optional"},
                    "status": {
                        "type": "string",
                        "enum": ["CONFIRMED", "CANCELLED", "PENDING"],
                        "description": "New status - optional"
                    }
                },
                "required": ["confirmation_id"]
            }),
            ToolKind::CancelFlightTicket => json!({
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID (e.g., 'ABC123')"}
                },
                "required": ["confirmation_id"]
            }),
            ToolKind::ListFlightTickets => json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Maximum number of tickets to return (default: 50)"}
                },
                "required": []
            }),
        }
    }

    /// The descriptor `tools/list` reports for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

// ─── ToolDescriptor ──────────────────────────────────────────────────────────

/// MCP tool definition as returned by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
