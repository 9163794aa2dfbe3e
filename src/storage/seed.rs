use super::store::{QuoteStore, StoreError};
use crate::search::types::Quote;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Contents of a seed file.
///
/// Either a bare JSON array of quotes or an object that also carries API
/// keys to register.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedFile {
    Quotes(Vec<Quote>),
    Full {
        quotes: Vec<Quote>,
        #[serde(default)]
        api_keys: Vec<String>,
    },
}

impl SeedFile {
    pub fn into_parts(self) -> (Vec<Quote>, Vec<String>) {
        match self {
            SeedFile::Quotes(quotes) => (quotes, Vec::new()),
            SeedFile::Full { quotes, api_keys } => (quotes, api_keys),
        }
    }
}

pub fn load_seed(path: &Path) -> Result<SeedFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path.display()))?;
    Ok(seed)
}

/// Loads quotes and API keys into `store`, returning how many of each.
pub async fn apply_seed(store: &dyn QuoteStore, seed: SeedFile) -> Result<(usize, usize), StoreError> {
    let (quotes, api_keys) = seed.into_parts();

    let inserted = store.insert_quotes(quotes).await?;
    for api_key in &api_keys {
        let user_id = store.insert_user(api_key).await?;
        tracing::debug!("Registered API key for user {}", user_id);
    }

    tracing::info!("Seeded {} quote(s) and {} API key(s)", inserted, api_keys.len());
    Ok((inserted, api_keys.len()))
}
