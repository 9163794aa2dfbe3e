use clap::Parser;
use quote_service::config::Config;
use quote_service::search::types::MatchPolicy;
use quote_service::server::build_router;
use quote_service::storage::memory::MemoryStore;
use quote_service::storage::seed::{apply_seed, load_seed};
use quote_service::storage::sqlite::SqliteStore;
use quote_service::storage::store::QuoteStore;
use quote_service::usage::recorder::UsageRecorder;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // 1. Storage:
    let store: Arc<dyn QuoteStore> = match &config.database {
        Some(path) => {
            tracing::info!("Opening SQLite store at {}", path.display());
            Arc::new(SqliteStore::open(path)?)
        }
        None => {
            tracing::info!("No database configured, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if let Some(path) = &config.seed {
        let seed = load_seed(path)?;
        apply_seed(store.as_ref(), seed).await?;
    }

    // 2. Usage logging:
    let recorder = UsageRecorder::start(store.clone(), config.usage_workers);

    // 3. HTTP Router:
    let policy = MatchPolicy::with_scan_cap(config.fuzzy_scan_cap);
    tracing::info!("Fuzzy phase scans up to {} quotes", policy.fuzzy_scan_cap);
    let app = build_router(store, recorder.clone(), policy);

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    recorder.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
