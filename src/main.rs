use anyhow::Result;

use ronin_v2x::config::Config;
use ronin_v2x::dashboard::Dashboard;
use ronin_v2x::telemetry::{RngSource, TelemetryEngine, TelemetrySimulator};
use ronin_v2x::util::setup_logging;
use ronin_v2x::web::WebServer;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    setup_logging(&config.general.log_level)?;
    info!("Ronin V2X starting...");
    info!("Simulation: {:?}", &config.simulation);

    // Create a shutdown signal channel
    let (shutdown_tx, _) = broadcast::channel(1);

    let dashboard = Dashboard::new();
    let simulator = TelemetrySimulator::new(
        config.simulation.clone(),
        RngSource::from_seed_option(config.simulation.seed),
    )?;
    let engine = TelemetryEngine::start(simulator, dashboard.clone());

    let web_handle = if config.web.enabled {
        let server = WebServer::new(dashboard, config.web.clone(), config.simulation.clone());
        spawn_web_server(server, shutdown_tx.subscribe())
    } else {
        info!("Web server disabled in config, skipping...");
        tokio::spawn(async {})
    };

    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping services..."),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }
    if shutdown_tx.send(()).is_err() {
        info!("No services left to notify");
    }

    engine.shutdown().await?;
    if let Err(e) = web_handle.await {
        error!("Web server join error: {}", e);
    }

    info!("All services stopped, shutting down");
    Ok(())
}

fn spawn_web_server(
    server: WebServer,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let stop_on_signal = async {
            if shutdown.recv().await.is_err() {
                error!("Shutdown channel closed");
            }
            info!("Shutting down web server...");
            server.stop();
        };
        let (result, ()) = tokio::join!(server.start(), stop_on_signal);
        if let Err(e) = result {
            error!("Web server error: {}", e);
        }
    })
}
