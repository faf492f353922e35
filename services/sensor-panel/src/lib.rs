//! Sensor panel - polls a sensor-data endpoint and serves a dashboard
//!
//! Shows the most recent readings in a sortable table, charts the whole
//! history, and exports it as an xlsx workbook.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod io;
pub mod panel;
pub mod poller;
pub mod reading;
pub mod render;
pub mod sort;
pub mod state;


pub use config::{load_config, Config};
pub use error::{PanelError, Result};
pub use panel::SensorPanel;
pub use reading::{Reading, ReadingField, SortConfig, SortDirection};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;

/// Run the sensor panel with the given configuration until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let cancel = CancellationToken::new();

    let mut panel = SensorPanel::new(config.source.url.clone(), http);
    panel.activate();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    if config.dashboard.enabled {
        let router = dashboard::build_router(Arc::clone(panel.state()), &config);
        let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            PanelError::Dashboard(format!(
                "Failed to bind dashboard to port {}: {}",
                config.dashboard.port, e
            ))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let cancel_for_dashboard = cancel.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_for_dashboard.cancelled().await;
            })
            .await?;
        tracing::debug!("Dashboard stopped");
    } else {
        tracing::info!("Dashboard disabled, polling only");
        cancel.cancelled().await;
    }

    panel.shutdown().await;
    tracing::info!("Sensor panel stopped");

    Ok(())
}
