//! Inbound HTTP server: routes, shared state and graceful shutdown.

pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use crate::verification::Verifier;

/// State shared by every handler.
pub struct AppState {
    pub verifier: Verifier,
    /// Cancelled once on shutdown; in-flight poll loops hold child tokens.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(verifier: Verifier, shutdown: CancellationToken) -> Self {
        Self { verifier, shutdown }
    }
}

pub type SharedState = Arc<AppState>;

/// Request body cap. A maximal bulk list (500,000 addresses) runs to roughly 16 MB of JSON;
/// anything below this reaches the validator and gets an envelope back.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// The workflow host calls `/execute` with either POST or GET.
fn execute<H, T>(handler: H) -> MethodRouter<SharedState>
where
    H: axum::handler::Handler<T, SharedState> + Clone,
    T: 'static,
{
    post(handler.clone()).get(handler)
}

fn module_routes<H, T>(path: &str, handler: H) -> Router<SharedState>
where
    H: axum::handler::Handler<T, SharedState> + Clone,
    T: 'static,
{
    Router::new()
        .route(&format!("{path}/execute"), execute(handler))
        .route(&format!("{path}/content"), execute(handlers::content))
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .merge(module_routes("/check", handlers::check))
        .merge(module_routes("/verify_single_email", handlers::verify_single))
        .merge(module_routes("/verify_bulk", handlers::verify_bulk))
        .merge(module_routes("/verify_bulk/submit", handlers::submit_bulk))
        .merge(module_routes("/verify_bulk/status", handlers::bulk_status))
        .merge(module_routes("/verify_bulk/emails", handlers::bulk_lookup))
        .merge(module_routes("/verify_bulk/results", handlers::bulk_results))
        .merge(module_routes("/verify_bulk/destroy", handlers::destroy_bulk))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until Ctrl-C or SIGTERM.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = config.bind_address.parse()?;
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(
        Verifier::from_config(&config)?,
        shutdown.clone(),
    ));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Initialization(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!(target: "service", %addr, base_url = %config.api_base_url, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!(target: "service", "Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "service", error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(target: "service", error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!(target: "service", "Shutdown requested, cancelling in-flight polls");
    shutdown.cancel();
}
