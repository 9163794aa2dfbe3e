//! Runtime configuration, read from flags with environment fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "quote-service", version, about = "Read-only quotes API with exact and fuzzy search")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "QUOTES_BIND", default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,

    /// SQLite database file. Without it quotes live in memory.
    #[arg(long, env = "QUOTES_DATABASE")]
    pub database: Option<PathBuf>,

    /// JSON file of quotes (and optionally API keys) loaded at startup.
    #[arg(long, env = "QUOTES_SEED")]
    pub seed: Option<PathBuf>,

    /// Maximum number of quotes scored by the fuzzy phase.
    #[arg(long, env = "QUOTES_FUZZY_SCAN_CAP", default_value_t = 1000)]
    pub fuzzy_scan_cap: usize,

    /// Background workers persisting usage logs.
    #[arg(long, env = "QUOTES_USAGE_WORKERS", default_value_t = 2)]
    pub usage_workers: usize,

    #[arg(long, env = "QUOTES_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}
