use crate::config::ProductsConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::services::{spawn_connection_supervisor, ConnectionProvider, DocumentStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub provider: ConnectionProvider,
}

impl AppState {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Snapshot of the current handle, or the "not connected" error.
    pub async fn store(&self) -> Result<Arc<dyn DocumentStore>, ApiError> {
        self.provider.current().await.ok_or_else(|| {
            tracing::warn!("Request rejected: database not connected");
            ApiError::NotConnected
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/deals", get(handlers::list_deals))
        .route("/products/sku/:id", get(handlers::get_product_by_sku))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    provider: ConnectionProvider,
    supervisor: JoinHandle<()>,
}

impl Application {
    /// Binds the listener and starts connecting to MongoDB in the background.
    /// The server accepts requests before the database is reachable.
    pub async fn build(config: ProductsConfig) -> Result<Self, AppError> {
        let provider = ConnectionProvider::new();
        let supervisor = spawn_connection_supervisor(provider.clone(), config.mongodb.clone());

        let app = build_router(AppState::new(provider.clone()));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            provider,
            supervisor,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let result = self.server.await;
        self.supervisor.abort();
        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
