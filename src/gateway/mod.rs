//! Enforcement gateway notifications.
//!
//! The gateway process that actually throttles traffic caches host
//! configurations; after an update or delete it must be told to drop its
//! cached copy. The signal is fire-and-forget: a failed purge is logged and
//! never fails the originating request (the gateway's cache TTL is the
//! backstop).

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Gateway notifier settings.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Base URL of the gateway communicator, e.g. `http://gateway:9800`
    pub base_url: String,
    /// Shared secret sent as the Authorization header
    pub secret: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Sends cache invalidation signals to the enforcement gateway.
#[derive(Debug, Clone)]
pub struct GatewayNotifier {
    client: Client,
    config: NotifierConfig,
}

impl GatewayNotifier {
    pub fn new(config: NotifierConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Tell the gateway to drop its cached copy of a configuration.
    ///
    /// Never returns an error; both transport failures and non-200
    /// responses are logged and swallowed.
    pub async fn purge_host(&self, id: &str) {
        let url = format!("{}/cache/hosts/{}", self.config.base_url, id);

        let result = self
            .client
            .delete(&url)
            .header("Authorization", &self.config.secret)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(id = %id, "purged gateway host cache");
            }
            Ok(response) => {
                warn!(
                    id = %id,
                    status = %response.status(),
                    "gateway rejected host cache purge"
                );
            }
            Err(err) => {
                warn!(id = %id, error = %err, "failed to reach gateway for cache purge");
            }
        }
    }
}
