//! HTTP server wiring and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use harvest_manager::{Database, ManagerConfig};

use crate::error::ServerError;
use crate::routes;
use crate::state::AppState;

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: ManagerConfig, db: Database) -> Self {
        Self {
            state: Arc::new(AppState::new(db, config)),
        }
    }

    /// The full application router, including middleware.
    pub fn router(&self) -> Router {
        let mut router = routes::routes(self.state.clone()).layer(TraceLayer::new_for_http());

        if self.state.config.server.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = &self.state.config.server.addr;
        addr.parse().map_err(|e| ServerError::InvalidAddr {
            addr: addr.clone(),
            source: e,
        })
    }

    /// Binds and serves until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.addr()?;
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr = %addr, "Harvest manager listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
