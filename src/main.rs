use clap::Parser;

use flight_ticket_tools::config::{ServerConfig, TransportMode};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    flight_ticket_tools::init_tracing(config.transport() == TransportMode::Http);

    let code = match flight_ticket_tools::run_server(config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "server failed");
            eprintln!("flight-ticket-tools: {e:#}");
            1
        }
    };

    // A pending stdin read would otherwise block runtime shutdown.
    std::process::exit(code);
}
