//! LDP resource server.
//!
//! Serves Basic, Direct and Indirect containers, RDF sources and binaries
//! over HTTP.

use std::sync::Arc;

use clap::Parser;
use ldp_persistence::backends::memory::MemoryBackend;
use ldp_persistence::core::ResourceStorage;
use ldp_rest::{AppState, ServerConfig, StorageBackendMode, create_app_with_state, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use ldp_persistence::backends::sqlite::SqliteBackend;

/// Opens the SQLite database named by the configuration and creates its
/// schema.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_path();
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = SqliteBackend::open(db_path)?;
    backend.init_schema()?;

    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, base_url = %config.base_iri(), "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Creates the root container if needed and serves `storage`.
async fn start<S>(storage: S, config: ServerConfig) -> anyhow::Result<()>
where
    S: ResourceStorage + 'static,
{
    let state = AppState::new(Arc::new(storage), config.clone());
    state.repository().init_root().await?;

    let app = create_app_with_state(state);
    serve(app, &config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        auth_enabled = config.auth_enabled,
        "Starting LDP server"
    );

    match backend_mode {
        StorageBackendMode::Sqlite => start_sqlite(config).await,
        StorageBackendMode::Memory => start(MemoryBackend::new(), config).await,
    }
}

#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    start(backend, config).await
}

/// Fallback when the sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p ldp-server --features sqlite, \
         or set LDP_STORAGE_BACKEND=memory"
    )
}
