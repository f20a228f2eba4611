//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use rollcall_presence::{Issuer, Verifier};
use rollcall_utils::StatsCounter;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Counter names exposed on `/api/telemetry`.
pub mod stat {
    pub const ISSUED: &str = "issued";
    pub const ACCEPTED_ON_TIME: &str = "accepted_on_time";
    pub const ACCEPTED_LATE: &str = "accepted_late";
    pub const REJECTED: &str = "rejected";
    pub const STORE_ERRORS: &str = "store_errors";

    pub const ALL: &[&str] = &[ISSUED, ACCEPTED_ON_TIME, ACCEPTED_LATE, REJECTED, STORE_ERRORS];
}

/// Shared state handed to every handler.
pub struct AppState {
    pub issuer: Arc<Issuer>,
    pub verifier: Arc<Verifier>,
    pub stats: StatsCounter,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(issuer: Issuer, verifier: Verifier) -> Self {
        Self {
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            stats: StatsCounter::new(stat::ALL),
            started_at: Instant::now(),
        }
    }
}

/// Build the router with every route and middleware layer.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/telemetry", get(handlers::telemetry))
        .route("/api/tokens/issue", post(handlers::issue))
        .route("/api/tokens/verify", post(handlers::verify))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { addr, state }
    }

    /// Serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        info!("RPC server listening on {}", self.addr);
        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
