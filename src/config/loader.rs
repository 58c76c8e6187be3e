use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::hostcfg::MAX_PERIOD_SECS;

use super::types::Config;

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .context("failed to parse YAML configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.address == self.admin.address {
            anyhow::bail!("api and admin servers cannot share an address");
        }

        if self.gateway.base_url.is_empty() {
            anyhow::bail!("gateway base_url must be set");
        }
        if self.gateway.base_url.ends_with('/') {
            anyhow::bail!("gateway base_url must not end with a slash");
        }
        if self.gateway.secret.is_empty() {
            anyhow::bail!("gateway secret must be set");
        }

        // Validate token entries are unique
        let mut tokens = std::collections::HashSet::new();
        for entry in &self.auth.tokens {
            if entry.token.is_empty() {
                anyhow::bail!("auth token for user '{}' is empty", entry.user_id);
            }
            if !tokens.insert(&entry.token) {
                anyhow::bail!("duplicate auth token for user '{}'", entry.user_id);
            }
        }

        if self.limits.max_window_secs == 0 || self.limits.max_window_secs > MAX_PERIOD_SECS {
            anyhow::bail!(
                "max_window_secs must be in (0, {}], got {}",
                MAX_PERIOD_SECS,
                self.limits.max_window_secs
            );
        }

        info!("configuration validated successfully");
        Ok(())
    }
}
