//! Serve command - runs the HTTP API server

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Run the API server
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config);

    config.validate()?;

    let state = crate::create_app_state_with_config(&config).await?;
    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
