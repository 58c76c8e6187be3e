//! Rules API server assembly.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::{require_auth, TokenVerifier};
use crate::config::LimitsConfig;
use crate::gateway::GatewayNotifier;
use crate::store::Storage;

use super::handlers::{
    create_rule, delete_rule, gateway_get_rule, get_constraints, get_plan, get_rule, list_rules,
    not_found, update_rule, upgrade_plan,
};

/// Shared state for the rules API handlers.
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub notifier: GatewayNotifier,
    pub limits: LimitsConfig,
}

/// Assemble the rules API router.
///
/// User-facing routes sit behind the bearer-token middleware; the gateway
/// fetch and the constraint table are open (the gateway authenticates at
/// the network layer, the table is public policy).
pub fn router(state: Arc<AppState>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let authenticated = Router::new()
        .route("/rules", post(create_rule).get(list_rules))
        .route(
            "/rules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
        .route("/plans", get(get_plan))
        .route("/plans/upgrade", post(upgrade_plan))
        .layer(middleware::from_fn_with_state(verifier, require_auth));

    Router::new()
        .merge(authenticated)
        .route("/gateway/rules/:id", get(gateway_get_rule))
        .route("/constraints", get(get_constraints))
        .fallback(not_found)
        .with_state(state)
}

/// The rules API server.
pub struct ApiServer {
    address: SocketAddr,
    router: Router,
}

impl ApiServer {
    pub fn new(address: SocketAddr, state: Arc<AppState>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            address,
            router: router(state, verifier),
        }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.address)
            .await
            .with_context(|| format!("failed to bind rules API to {}", self.address))?;

        info!(address = %self.address, "rules API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("rules API server failed")
    }
}
