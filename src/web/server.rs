use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::view;
use crate::{
    config::{SimulationConfig, WebConfig},
    dashboard::Dashboard,
};

use anyhow::{Context, Result};

pub struct WebServer {
    dashboard: Dashboard,
    web: WebConfig,
    simulation: SimulationConfig,
    stopping: Arc<AtomicBool>,
}

impl WebServer {
    pub fn new(dashboard: Dashboard, web: WebConfig, simulation: SimulationConfig) -> Self {
        Self {
            dashboard,
            web,
            simulation,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn router(&self) -> Router {
        view::routes(self.dashboard.clone(), self.simulation.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    pub async fn start(&self) -> Result<()> {
        let app = self.router();

        let host = &self.web.host;
        let port = self.web.port;
        info!("Starting web server on http://{}:{}", host, port);

        let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
            .await
            .context(format!("Failed to bind to port {}", port))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal(self.stopping.clone()))
            .await
            .context("Failed to serve")?;

        info!("Web server stopped");
        Ok(())
    }

    async fn shutdown_signal(stopping: Arc<AtomicBool>) {
        while !stopping.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Makes a running or future `start` drain connections and return.
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_server() -> WebServer {
        let web = WebConfig {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        WebServer::new(Dashboard::new(), web, SimulationConfig::default())
    }

    #[tokio::test]
    async fn test_stop_ends_running_server() -> Result<()> {
        let server = ephemeral_server();
        let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(server.start(), async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                server.stop();
            })
        })
        .await?;
        result
    }

    #[tokio::test]
    async fn test_stop_before_start_is_honoured() -> Result<()> {
        let server = ephemeral_server();
        server.stop();
        tokio::time::timeout(Duration::from_secs(5), server.start()).await?
    }
}
