//! Typed tool inputs and upstream request bodies.
//!
//! Each tool's `arguments` object is deserialized into one of these structs
//! before any request leaves the process. Field names match the wire names
//! used by both the MCP caller and the ticket service.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Number of tickets requested when `limit` is not supplied.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

// ─── Ticket Fields ───────────────────────────────────────────────────────────

/// Lifecycle state of a ticket as understood by the ticket service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Confirmed,
    Cancelled,
    Pending,
}

// ─── Tool Arguments ──────────────────────────────────────────────────────────

/// `health_check` takes no arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckArgs {}

/// `create_flight_ticket` arguments. Serializes directly as the `POST /ticket` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTicketArgs {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub passengers: NonZeroU32,
    /// An empty string counts as "not supplied"; the service generates one.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub flight_number: Option<String>,
}

/// Arguments for tools addressing a single ticket (`get`, `cancel`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketIdArgs {
    pub confirmation_id: String,
}

/// `update_flight_ticket` arguments.
///
/// Optional fields left out (or sent as `null`) mean "do not change".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketArgs {
    pub confirmation_id: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub passengers: Option<NonZeroU32>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

impl UpdateTicketArgs {
    /// Split into the path identifier and the `PUT` body.
    pub fn into_parts(self) -> (String, TicketChanges) {
        let changes = TicketChanges {
            origin: self.origin,
            destination: self.destination,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            passengers: self.passengers,
            flight_number: self.flight_number,
            status: self.status,
        };
        (self.confirmation_id, changes)
    }
}

/// `PUT /ticket/{id}` body. Only supplied fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<NonZeroU32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

/// `list_flight_tickets` arguments.
///
/// A missing `limit` means [`DEFAULT_LIST_LIMIT`]; an explicit `null` means
/// "let the service decide" and sends no query parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTicketsArgs {
    #[serde(default = "default_list_limit")]
    pub limit: Option<u32>,
}

impl Default for ListTicketsArgs {
    fn default() -> Self {
        Self {
            limit: default_list_limit(),
        }
    }
}

fn default_list_limit() -> Option<u32> {
    Some(DEFAULT_LIST_LIMIT)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
