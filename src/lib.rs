//! FlightTicketTools: an MCP tool server fronting the flight ticket REST
//! service, plus a stdio → HTTP forwarding proxy.

pub mod config;
pub mod jsonrpc;
pub mod proxy;
pub mod tools;
pub mod transport;
pub mod upstream;

use anyhow::Context;

use config::{ProxyConfig, ServerConfig, TransportMode};
use jsonrpc::Dispatcher;
use proxy::ForwardingProxy;
use transport::{run_stdio, serve_http, HttpState};
use upstream::TicketServiceClient;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "flight_ticket_tools=info,warn";

/// Initialize the tracing subscriber.
///
/// Logs always go to stderr; stdout is reserved for protocol traffic. `json`
/// selects one JSON object per line, otherwise compact text without ANSI
/// colours. Calling this twice is a no-op.
pub fn init_tracing(json: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let result = if json {
        fmt::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init()
    } else {
        fmt::fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}

/// Run the MCP tool server on the transport selected by `config`.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let transport = config.transport();
    let client = TicketServiceClient::new(&config.upstream_url)
        .context("invalid FLIGHT_TICKET_SERVICE_URL")?;

    // Startup banner
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = transport.as_str(),
        environment = %config.environment,
        upstream = %client.base_url(),
        pid = std::process::id(),
        "=== FlightTicketTools starting ==="
    );

    let dispatcher = Dispatcher::new(client);

    match transport {
        TransportMode::Stdio => run_stdio(dispatcher).await?,
        TransportMode::Http => {
            let state = HttpState::new(dispatcher, config.environment.clone());
            serve_http(config.listen_addr(), state).await?
        }
    }

    tracing::info!("=== FlightTicketTools stopped ===");
    Ok(())
}

/// Run the forwarding proxy over the process's stdin/stdout.
pub async fn run_proxy(config: ProxyConfig) -> anyhow::Result<()> {
    let proxy = ForwardingProxy::new(&config.remote_url, config.timeout())
        .context("invalid REMOTE_MCP_URL")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        remote = %proxy.remote_url(),
        timeout_secs = config.timeout_secs,
        pid = std::process::id(),
        "=== FlightTicketProxy starting ==="
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = proxy.run(stdin, stdout) => result?,
        _ = transport::shutdown_signal() => {},
    }

    tracing::info!("=== FlightTicketProxy stopped ===");
    Ok(())
}
