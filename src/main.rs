use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use limitd::bootstrap::Server;
use limitd::config::Config;
use limitd::telemetry::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "limitd")]
#[command(author, version, about = "Configuration plane for a rate-limiting gateway")]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate config and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = Config::load(&args.config)?;

    let tracing_config = TracingConfig {
        service_name: "limitd".to_string(),
        log_level: config.telemetry.log_level.clone(),
        json_logs: config.telemetry.json_logs,
    };

    init_tracing(&tracing_config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "starting limitd"
    );

    info!(
        api = %config.api.address,
        admin = %config.admin.address,
        users = config.auth.tokens.len(),
        "configuration loaded"
    );

    // Validate only mode
    if args.validate {
        info!("configuration is valid");
        return Ok(());
    }

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
