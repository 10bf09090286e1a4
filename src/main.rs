use roomcast::config::load_config;
use roomcast::hub::Hub;
use roomcast::transport::websocket::start_websocket_server;
use roomcast::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init("info");

    if let Err(e) = run().await {
        error!("Server failed: {}", e);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let hub = Hub::spawn();

    tokio::select! {
        result = start_websocket_server(&addr, hub, config) => {
            result?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}
