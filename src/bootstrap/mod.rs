//! Process assembly.
//!
//! Wires configuration into the concrete collaborators (in-memory storage,
//! static token verifier, gateway notifier), seeds the configured user
//! accounts, and runs the rules API and admin servers until ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::admin::{AdminServer, AdminState};
use crate::api::{ApiServer, AppState};
use crate::auth::{StaticTokenVerifier, TokenVerifier};
use crate::config::Config;
use crate::gateway::{GatewayNotifier, NotifierConfig};
use crate::store::{MemoryStorage, Storage, UserRecord};

/// The assembled limitd process.
pub struct Server {
    config: Config,
    storage: Arc<dyn Storage>,
    verifier: Arc<dyn TokenVerifier>,
    notifier: GatewayNotifier,
}

impl Server {
    /// Build collaborators from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let verifier: Arc<dyn TokenVerifier> =
            Arc::new(StaticTokenVerifier::from_entries(&config.auth.tokens));

        let notifier = GatewayNotifier::new(NotifierConfig {
            base_url: config.gateway.base_url.clone(),
            secret: config.gateway.secret.clone(),
            timeout: config.gateway.timeout,
        })
        .context("failed to build gateway notifier")?;

        Ok(Self {
            config,
            storage,
            verifier,
            notifier,
        })
    }

    /// Seed user accounts named in the auth config. Existing records keep
    /// their plan.
    async fn seed_users(&self) -> Result<()> {
        for entry in &self.config.auth.tokens {
            self.storage
                .upsert_user(UserRecord {
                    id: entry.user_id.clone(),
                    name: entry.name.clone(),
                    email: entry.email.clone(),
                    plan: Default::default(),
                })
                .await
                .context("failed to seed user")?;
        }
        info!(users = self.config.auth.tokens.len(), "seeded user accounts");
        Ok(())
    }

    /// Run both servers until ctrl-c.
    pub async fn run(self) -> Result<()> {
        self.seed_users().await?;

        let app_state = Arc::new(AppState {
            storage: self.storage.clone(),
            notifier: self.notifier.clone(),
            limits: self.config.limits.clone(),
        });
        let admin_state = Arc::new(AdminState::new());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let api = ApiServer::new(self.config.api.address, app_state, self.verifier.clone());
        let mut api_shutdown = shutdown_rx.clone();
        let api_task = tokio::spawn(async move {
            api.serve(async move {
                let _ = api_shutdown.changed().await;
            })
            .await
        });

        let admin = AdminServer::new(self.config.admin.address, admin_state.clone());
        let mut admin_shutdown = shutdown_rx;
        let admin_task = tokio::spawn(async move {
            admin
                .serve(async move {
                    let _ = admin_shutdown.changed().await;
                })
                .await
        });

        // Give the listeners a moment to bind before reporting ready
        tokio::time::sleep(Duration::from_millis(50)).await;
        admin_state.set_ready(true);
        info!("limitd ready");

        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for ctrl-c")?;

        info!("shutdown signal received");
        admin_state.set_ready(false);
        let _ = shutdown_tx.send(true);

        for (name, task) in [("api", api_task), ("admin", admin_task)] {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(server = name, error = ?err, "server exited with error"),
                Err(err) => warn!(server = name, error = ?err, "server task panicked"),
            }
        }

        info!("shutdown complete");
        Ok(())
    }
}
