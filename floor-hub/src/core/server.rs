//! Server Implementation
//!
//! HTTP + Socket.IO 服务器启动和管理

use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, Result, ServerError};
use crate::hub::{Hub, HubHandle};
use crate::transport::socketio;

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// HTTP routes with the Socket.IO layer on top
    pub fn router(hub: HubHandle) -> Router {
        api::router(hub.clone())
            .layer(socketio::layer(hub))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run until Ctrl-C, then stop the hub task
    pub async fn run(&self) -> Result<()> {
        let shutdown = CancellationToken::new();
        let (hub, hub_task) = HubHandle::spawn(Hub::from_config(&self.config), shutdown.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!("🍽️ Floor hub listening on {}", addr);

        let token = shutdown.clone();
        axum::serve(listener, Self::router(hub))
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                token.cancel();
            })
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        shutdown.cancel();
        if let Err(e) = hub_task.await {
            tracing::error!("Hub task failed: {}", e);
        }
        Ok(())
    }
}
