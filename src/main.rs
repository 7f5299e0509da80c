mod config;
mod constants;
mod detector;
mod logging;
mod models;
mod routes;
mod services;

use anyhow::Context;
use std::sync::Arc;

use config::Config;
use detector::DeepfakeDetector;

pub struct AppState {
    /// Loaded once before the listener binds; read-only afterwards
    pub detector: Arc<DeepfakeDetector>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env().context("Invalid configuration")?;
    log::info!(
        "Starting DeepScan API (architecture {}, weights {:?})",
        config.architecture,
        config.weights
    );

    // Weight download and mmap are blocking
    let architecture = config.architecture;
    let weights = config.weights.clone();
    let detector = tokio::task::spawn_blocking(move || DeepfakeDetector::load(architecture, &weights))
        .await
        .context("Detector loading task panicked")?
        .context("Failed to load detector")?;

    let state = Arc::new(AppState {
        detector: Arc::new(detector),
    });

    let app = routes::build_app(state, config.max_upload_size, &config.cors_allowed_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
