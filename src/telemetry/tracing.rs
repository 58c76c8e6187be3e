use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name
    pub service_name: String,

    /// Log level
    pub log_level: String,

    /// JSON log format
    pub json_logs: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "limitd".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Initialize tracing. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        let fmt_layer = fmt::layer().json().with_current_span(true).with_target(true);
        subscriber.with(fmt_layer).init();
    } else {
        let fmt_layer = fmt::layer().with_target(true);
        subscriber.with(fmt_layer).init();
    }

    info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "tracing initialized"
    );

    Ok(())
}
