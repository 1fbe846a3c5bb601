use clap::Parser;

use flight_ticket_tools::config::ProxyConfig;

#[tokio::main]
async fn main() {
    let config = ProxyConfig::parse();
    flight_ticket_tools::init_tracing(false);

    let code = match flight_ticket_tools::run_proxy(config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "proxy failed");
            eprintln!("flight-ticket-proxy: {e:#}");
            1
        }
    };

    // A pending stdin read would otherwise block runtime shutdown.
    std::process::exit(code);
}
