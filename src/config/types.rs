use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::auth::TokenEntry;

/// Root configuration for limitd
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Rules API server
    #[serde(default)]
    pub api: ApiConfig,

    /// Admin API (health, metrics)
    #[serde(default)]
    pub admin: AdminConfig,

    /// Caller authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Enforcement gateway notifier
    pub gateway: GatewayConfig,

    /// Operational limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Rules API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bind address
    #[serde(default = "default_api_address")]
    pub address: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_api_address(),
        }
    }
}

fn default_api_address() -> SocketAddr {
    "127.0.0.1:9080".parse().expect("static address")
}

/// Admin server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Bind address
    #[serde(default = "default_admin_address")]
    pub address: SocketAddr,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            address: default_admin_address(),
        }
    }
}

fn default_admin_address() -> SocketAddr {
    "127.0.0.1:9081".parse().expect("static address")
}

/// Caller authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Accepted bearer tokens
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

/// Enforcement gateway notifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway communicator
    pub base_url: String,

    /// Shared secret for the communicator
    pub secret: String,

    /// Purge request timeout
    #[serde(default = "default_gateway_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_gateway_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Operational limits enforced at the handler layer
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Tighter ceiling for period/duration, re-checked after schema
    /// validation
    #[serde(default = "default_max_window_secs")]
    pub max_window_secs: u64,

    /// Configurations a free-plan account may hold
    #[serde(default = "default_free_plan_rules")]
    pub free_plan_rules: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_window_secs: default_max_window_secs(),
            free_plan_rules: default_free_plan_rules(),
        }
    }
}

fn default_max_window_secs() -> u64 {
    86_400 // 24 hours
}

fn default_free_plan_rules() -> usize {
    2
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON log format
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
