//! Loteamento Server
//!
//! An OCR extraction server for scanned land-subdivision ("loteamento")
//! survey PDFs. Uploads are rasterized page by page, recognized with
//! Tesseract in three page-segmentation modes, and the pooled transcriptions
//! are reconciled into a deduplicated list of plot records.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod extract;
mod ocr;
mod pdf;
mod routes;
mod state;

use config::Config;
use ocr::{Recognizer, TesseractRecognizer};
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loteamento_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Loteamento Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Render DPI: {}", config.ocr.dpi);
    tracing::info!("OCR language: {}", config.ocr.language);

    // Initialize the recognizer and check the host has Tesseract installed
    let recognizer: Arc<dyn Recognizer> =
        Arc::new(TesseractRecognizer::new(&config.ocr.tesseract_binary));
    if !recognizer.is_available().await {
        tracing::warn!(
            "Tesseract binary '{}' not found; /process-pdf will fail until it is installed",
            config.ocr.tesseract_binary
        );
    }

    let max_upload_bytes = config.max_upload_bytes();
    let addr = bind_addr(&config.server.host, config.server.port);
    let app_state = AppState::new(config, recognizer);

    // Build CORS layer (the upload UI is served from a different origin)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::process::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start server with graceful shutdown
    tracing::info!("Loteamento Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("Server shutdown complete");
}

/// Resolve the configured bind address, falling back to all interfaces if
/// the host does not parse.
fn bind_addr(host: &str, port: u16) -> SocketAddr {
    match host.parse() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            tracing::warn!("Invalid SERVER_HOST '{}', binding to 0.0.0.0", host);
            SocketAddr::from(([0, 0, 0, 0], port))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_uses_configured_host() {
        let addr = bind_addr("127.0.0.1", 5000);
        assert_eq!(addr.to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_bind_addr_falls_back_on_invalid_host() {
        let addr = bind_addr("not-an-ip", 5000);
        assert_eq!(addr.to_string(), "0.0.0.0:5000");
    }
}
