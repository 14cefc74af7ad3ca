//! Registrar service entrypoint

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use registrar::api::ApiHandler;
use registrar::config::RegistrarConfig;
use registrar::persistence::MemberStore;
use registrar::registry::MemberRegistry;

use common::config::{ConfigValidation, LoggingConfig};

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Membership registration service")]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the schema bootstrap and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = RegistrarConfig::load(args.config.as_deref())?;
    init_logging(&config.logging, args.log_level.as_deref())?;

    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let store = MemberStore::new(&config.database).await?;

    if let Some(Commands::Migrate) = args.command {
        store.run_migrations().await?;
        info!("Migration complete");
        return Ok(());
    }

    let registry = Arc::new(MemberRegistry::new(store));
    let api = ApiHandler::new(config.server.clone(), registry);

    info!("Starting registrar v{}", common::VERSION);

    tokio::select! {
        result = api.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}

/// Initialize logging from configuration, with an optional CLI override
fn init_logging(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    let level = level_override.unwrap_or(&config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
