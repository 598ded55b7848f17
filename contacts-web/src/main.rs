//! contacts-web - Contact manager HTTP service
//!
//! Serves the contact JSON API and browser UI on top of a local SQLite file.
//! Settings resolve CLI > environment > TOML config > built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use contacts_common::config::{
    self, TomlConfig, DEFAULT_BIND_ADDRESS, DEFAULT_PORT,
};
use contacts_common::db::init::init_database;
use contacts_web::services::geocoder::GeocoderClient;
use contacts_web::services::reverse_lookup::DirectoryLookup;
use contacts_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for contacts-web
#[derive(Parser, Debug)]
#[command(name = "contacts-web")]
#[command(about = "Contact manager web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CONTACTS_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "CONTACTS_BIND")]
    bind: Option<String>,

    /// Folder holding contacts.db (also CONTACTS_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "CONTACTS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging starts so it can set the log level
    let (toml_config, config_source) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    let default_filter = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| "contacts_web=debug,contacts_common=info,tower_http=debug".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting contacts-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to open contacts database")?;

    let mut state = AppState::new(pool.clone()).with_statuses(toml_config.statuses.clone());

    match GeocoderClient::new(&toml_config.geocoder) {
        Ok(client) => {
            info!("Address suggestions via {}", toml_config.geocoder.base_url);
            state = state.with_suggester(Arc::new(client));
        }
        Err(e) => warn!("Address suggestions disabled: {}", e),
    }

    if toml_config.lookup.enabled {
        match DirectoryLookup::new(&toml_config.lookup) {
            Ok(lookup) => {
                info!("Reverse phone lookup enabled");
                state = state.with_lookup(Arc::new(lookup));
            }
            Err(e) => warn!("Reverse phone lookup disabled: {}", e),
        }
    }

    let app = build_router(state);

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let bind = args
        .bind
        .or(toml_config.bind_address.clone())
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("contacts-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
