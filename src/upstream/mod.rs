//! Upstream client for the flight ticket REST service.
//!
//! The service owns all ticket state. This module only issues single
//! best-effort HTTP calls and classifies what comes back.

pub mod client;
pub mod errors;

pub use client::{TicketServiceClient, DEFAULT_SERVICE_URL};
pub use errors::UpstreamError;
