//! Admin HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use super::handlers::{
    health_handler, live_handler, metrics_handler, ready_handler, stats_handler,
};

/// Admin server state.
pub struct AdminState {
    /// Server start time
    start_time: Instant,
    /// Is the server healthy
    healthy: AtomicBool,
    /// Is the server ready
    ready: AtomicBool,
}

impl AdminState {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            healthy: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    /// Set health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Set ready status.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }
}

impl Default for AdminState {
    fn default() -> Self {
        Self::new()
    }
}

/// The admin server.
pub struct AdminServer {
    address: SocketAddr,
    state: Arc<AdminState>,
}

impl AdminServer {
    pub fn new(address: SocketAddr, state: Arc<AdminState>) -> Self {
        Self { address, state }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/livez", get(live_handler))
            .route("/readyz", get(ready_handler))
            .route("/stats", get(stats_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.address)
            .await
            .with_context(|| format!("failed to bind admin API to {}", self.address))?;

        info!(address = %self.address, "admin API listening");

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("admin server failed")
    }
}
