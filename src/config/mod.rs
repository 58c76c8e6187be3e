mod loader;
mod types;

pub use types::{
    AdminConfig, ApiConfig, AuthConfig, Config, GatewayConfig, LimitsConfig, TelemetryConfig,
};
