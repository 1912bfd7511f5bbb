//! Oilwatch - buoy oil-detection monitoring service
//!
//! Polls the latest buoy reading from a backend, derives an oil-detection
//! flag, falls back to demo data when the backend is unreachable, and serves
//! the result as a dashboard.

pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod io;
pub mod poller;
pub mod reading;
pub mod render;
pub mod state;

pub use config::{load_config, Config};
pub use error::{OilwatchError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::poller::Poller;

/// Run the oilwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        Duration::from_secs(config.api.request_timeout_seconds),
    )?);
    let cancel = CancellationToken::new();

    let url = config.api.readings_url();
    tracing::info!("Polling {}", url);
    let poller = Arc::new(Poller::new(url, http, state::new_state_handle()));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let interval = Duration::from_secs(config.api.polling_interval_seconds);
    let timer = poller.spawn(interval, &cancel);

    if config.dashboard.enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            OilwatchError::Dashboard(format!("Failed to bind port {}: {}", addr.port(), e))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let router = dashboard::build_router(
            Arc::clone(&poller),
            dashboard::reload_interval_ms(interval),
        );
        let cancel_for_dashboard = cancel.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_for_dashboard.cancelled().await;
            })
            .await
            .map_err(|e| OilwatchError::Dashboard(e.to_string()))?;
        tracing::debug!("Dashboard stopped");
    } else {
        tracing::info!("Dashboard disabled, polling only");
        cancel.cancelled().await;
    }

    timer.stop().await;
    tracing::info!("Oilwatch stopped");

    Ok(())
}
