//! SpaceAPI Service
//!
//! Single binary providing:
//! - the public SpaceAPI document at `/spaceapi/v1/index`
//! - the settings form at `/admin/settings`
//! - maintenance commands for the settings store (show, set, purge)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use spaceapi_core::{OptionRegistry, SpaceRecord};
use spaceapi_http::{HttpServer, MiddlewareConfig};
use spaceapi_store::{SettingsStore, SqliteSettingsStore};
use spaceapi_web::{create_router, AppState};

mod config;

use config::ServiceConfig;

#[derive(Parser, Debug)]
#[command(name = "spaceapi-service")]
#[command(about = "SpaceAPI server for hackerspace metadata", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Settings database URL
    #[arg(long, global = true)]
    database: Option<String>,

    /// Bind address (host:port)
    #[arg(short, long)]
    bind: Option<String>,

    /// Static files directory
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,

    /// Disable compression
    #[arg(long)]
    no_compression: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print the current SpaceAPI document
    Show,
    /// Store one option by its public key
    Set {
        /// Public key, e.g. `space` or `lat`
        key: String,
        value: String,
    },
    /// Delete every stored SpaceAPI option
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,spaceapi_service=info,spaceapi_web=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let registry = Arc::new(config.registry());
    let store = open_store(&config.database_url).await?;

    execute(args.command.as_ref(), &config, registry, store).await
}

/// Run one command, then close the store whatever the outcome
async fn execute(
    command: Option<&Commands>,
    config: &ServiceConfig,
    registry: Arc<OptionRegistry>,
    store: Arc<SqliteSettingsStore>,
) -> Result<()> {
    let result = match command {
        None | Some(Commands::Serve) => serve(config, registry, store.clone()).await,
        Some(Commands::Show) => show(&registry, store.as_ref()).await,
        Some(Commands::Set { key, value }) => set(&registry, store.as_ref(), key, value).await,
        Some(Commands::Purge) => purge(&registry, store.as_ref()).await,
    };

    store.close().await;
    result
}

/// Defaults, then file, then environment, then flags
fn resolve_config(args: &Args) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::load_default()?,
    };
    config.apply_env_overrides();

    if let Some(url) = &args.database {
        config.database_url = url.clone();
    }
    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }
    if let Some(dir) = &args.static_dir {
        config.static_dir = Some(dir.clone());
    }
    if args.no_cors {
        config.cors = false;
    }
    if args.no_compression {
        config.compression = false;
    }

    Ok(config)
}

async fn open_store(url: &str) -> Result<Arc<SqliteSettingsStore>> {
    let store = if url == "sqlite::memory:" {
        warn!("Using an in-memory settings store; values are lost on exit");
        SqliteSettingsStore::in_memory().await
    } else {
        SqliteSettingsStore::new(url).await
    };

    let store = store.with_context(|| format!("Failed to open settings store at {}", url))?;
    Ok(Arc::new(store))
}

async fn serve(
    config: &ServiceConfig,
    registry: Arc<OptionRegistry>,
    store: Arc<SqliteSettingsStore>,
) -> Result<()> {
    info!("Starting SpaceAPI service...");
    if config.admin_password.is_none() {
        warn!("No admin password configured; /admin/settings is open to anyone");
    }

    let state = Arc::new(AppState::new(registry, store, config.web_config()));
    let router = create_router(state);

    let mut middleware = MiddlewareConfig::new()
        .cors(config.cors)
        .compression(config.compression)
        .timeout(config.request_timeout());
    if let Some(origins) = &config.cors_origins {
        middleware = middleware.cors_origins(origins.clone());
    }

    let mut builder = HttpServer::builder()
        .bind(&config.bind)
        .router(router)
        .middleware(middleware);
    if let Some(host) = &config.public_host {
        builder = builder.public_host(host.clone());
    }

    let server = builder
        .build()
        .with_context(|| format!("Invalid bind address '{}'", config.bind))?;
    server.serve().await?;

    Ok(())
}

async fn show(registry: &OptionRegistry, store: &dyn SettingsStore) -> Result<()> {
    let record = SpaceRecord::build(registry, store).await?;
    println!("{}", record.to_json()?);
    Ok(())
}

async fn set(
    registry: &OptionRegistry,
    store: &dyn SettingsStore,
    key: &str,
    value: &str,
) -> Result<()> {
    registry
        .store_value(store, key, value)
        .await
        .with_context(|| format!("Failed to set '{}'", key))?;
    info!("Stored {} = {:?}", registry.storage_name(key), value);
    Ok(())
}

async fn purge(registry: &OptionRegistry, store: &dyn SettingsStore) -> Result<()> {
    let mut removed = 0;
    for name in registry.storage_names() {
        if store.delete(name).await? {
            removed += 1;
        }
    }

    info!("Purged {} of {} SpaceAPI options", removed, registry.len());
    Ok(())
}
