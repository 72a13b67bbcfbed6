use std::net::SocketAddr;

mod handlers;

pub use handlers::{RelayState, build_router, chat_handler, relay_body};

use crate::config::proxy::ProxyConfig;

pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    if let Some(root) = &config.static_root {
        tracing::info!("Serving static files from {}", root.display());
    }
    tracing::info!("Relaying chat completions to {}", config.upstream.endpoint);

    let router = build_router(config);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining open relays");
}
