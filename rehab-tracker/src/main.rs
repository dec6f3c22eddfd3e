//! rehab-tracker - Knee rehab habit tracker service
//!
//! Startup sequence:
//! 1. Parse command line, resolve root folder, load bootstrap TOML
//! 2. Initialize tracing
//! 3. Open (or create) the SQLite database
//! 4. Serve the HTTP API, metrics, and UI

use anyhow::{Context, Result};
use clap::Parser;
use rehab_common::config::{self, RootFolderInitializer, RootFolderResolver, TomlConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rehab_tracker::{build_router, AppState};

const MODULE_NAME: &str = "rehab-tracker";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "rehab-tracker", version, about = "Knee rehab habit tracker")]
struct Args {
    /// Root folder holding rehab.db (overrides environment and config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// HTTP port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Bootstrap config file (default: ~/.config/rehab/rehab-tracker.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = args
        .config
        .clone()
        .or_else(|| config::config_file_path(MODULE_NAME))
        .map(|path| TomlConfig::load_or_default(&path))
        .unwrap_or_default();

    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting rehab-tracker v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder)
        .with_config_file(args.config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match rehab_common::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool).context("Failed to register metrics")?;
    let app = build_router(state);

    let port = args.port.unwrap_or(toml_config.port);
    let addr = format!("{}:{}", toml_config.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("rehab-tracker listening on http://{}", addr);
    info!("UI: http://{}/ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
