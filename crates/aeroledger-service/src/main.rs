//! Ledger Server Binary
//!
//! Runs the HTTP server hosting the aviation part ledger.

use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use aeroledger_service::{create_router, AppState, LedgerStore, MemoryStore, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServiceConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config).await?;

    info!(
        admin = %config.admin,
        name = ?config.name,
        port = config.port,
        "Starting ledger server"
    );

    // Create application state
    let port = config.port;
    let state = Arc::new(AppState { store, config });

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "Ledger listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn LedgerStore>, Box<dyn Error>> {
    match &config.database_url {
        Some(url) => {
            let store = aeroledger_service::PostgresStore::new(url, config.admin.clone()).await?;
            info!("Using PostgreSQL journal");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new(config.admin.clone()))),
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn LedgerStore>, Box<dyn Error>> {
    if config.database_url.is_some() {
        tracing::warn!("Database URL set but built without the postgres feature; ledger is in-memory");
    }
    Ok(Arc::new(MemoryStore::new(config.admin.clone())))
}
