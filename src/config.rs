//! Command-line and environment configuration for both binaries.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::proxy::{DEFAULT_REMOTE_URL, DEFAULT_TIMEOUT};
use crate::upstream::DEFAULT_SERVICE_URL;

/// `ENVIRONMENT` value that selects the stdio transport.
pub const LOCAL_ENVIRONMENT: &str = "local";

/// Which transport the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
}

impl TransportMode {
    /// `local` selects stdio; anything else selects HTTP.
    pub fn from_environment(environment: &str) -> Self {
        if environment == LOCAL_ENVIRONMENT {
            TransportMode::Stdio
        } else {
            TransportMode::Http
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Stdio => "stdio",
            TransportMode::Http => "http",
        }
    }
}

// ─── Server ──────────────────────────────────────────────────────────────────

/// MCP tool server settings.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flight-ticket-tools",
    version,
    about = "MCP tool server for the flight ticket service"
)]
pub struct ServerConfig {
    /// Port for the HTTP transport.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address the HTTP transport binds to.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// `local` serves over stdio; any other value serves over HTTP.
    #[arg(long, env = "ENVIRONMENT", default_value = LOCAL_ENVIRONMENT)]
    pub environment: String,

    /// Base URL of the flight ticket REST service.
    #[arg(long, env = "FLIGHT_TICKET_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub upstream_url: String,
}

impl ServerConfig {
    pub fn transport(&self) -> TransportMode {
        TransportMode::from_environment(&self.environment)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// ─── Proxy ───────────────────────────────────────────────────────────────────

/// Forwarding proxy settings.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flight-ticket-proxy",
    version,
    about = "Relay stdio JSON-RPC to a remote MCP HTTP endpoint"
)]
pub struct ProxyConfig {
    /// Remote MCP endpoint that receives every message.
    #[arg(long, env = "REMOTE_MCP_URL", default_value = DEFAULT_REMOTE_URL)]
    pub remote_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
