//! Raw byte access to dataset sources.
//!
//! A source is either a local path or an `http(s)` URL. Only dataset
//! preparation goes through here; aggregation works on loaded tables.

mod basic;
mod client;

pub use basic::{BasicClient, DEFAULT_TIMEOUT};
pub use client::SourceClient;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

/// Returns `true` if `source` should be fetched over HTTP rather than read from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the bytes behind `source`, fetching URLs with `client` and reading
/// anything else as a local file.
#[tracing::instrument(skip(client))]
pub async fn read_source<C: SourceClient>(client: &C, source: &str) -> Result<Bytes> {
    let bytes = if is_remote(source) {
        client
            .get(source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        Bytes::from(
            tokio::fs::read(source)
                .await
                .with_context(|| format!("failed to read {source}"))?,
        )
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}
