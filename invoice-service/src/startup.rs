//! Application startup and lifecycle management.

use crate::config::InvoiceConfig;
use crate::handlers;
use crate::services::{InvoiceProvider, InvoiceStore, MongoInvoiceStore, SeerbitClient};
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: InvoiceConfig,
    pub store: Arc<dyn InvoiceStore>,
    pub provider: Arc<dyn InvoiceProvider>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route(
            "/invoice/create",
            post(handlers::invoices::create_invoice)
                .get(handlers::invoices::get_invoice_named_create),
        )
        .route("/invoice/:invoice_id", get(handlers::invoices::get_invoice))
        .route(
            "/invoice/send/:invoice_id",
            post(handlers::invoices::send_invoice),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build against MongoDB and the SeerBit API named in `config`.
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        let store = MongoInvoiceStore::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await?;

        let provider = SeerbitClient::new(config.seerbit.clone()).map_err(|e| {
            tracing::error!("Failed to build SeerBit client: {}", e);
            AppError::InternalError(anyhow::anyhow!("SeerBit client error: {}", e))
        })?;
        tracing::info!("SeerBit client initialized");

        Self::build_with(config, Arc::new(store), Arc::new(provider)).await
    }

    /// Build with an injected store and provider.
    pub async fn build_with(
        config: InvoiceConfig,
        store: Arc<dyn InvoiceStore>,
        provider: Arc<dyn InvoiceProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            store,
            provider,
        };

        // Port 0 picks a random port for tests
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Invoice service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
