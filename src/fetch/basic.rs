use super::client::SourceClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Whole-request limit for one dataset download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`SourceClient`] over a shared `reqwest::Client`.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self(http))
    }
}

#[async_trait]
impl SourceClient for BasicClient {
    async fn get(&self, url: &str) -> Result<Bytes> {
        let resp = self.0.get(url).send().await?.error_for_status()?;
        debug!(status = %resp.status(), "Dataset download started");
        Ok(resp.bytes().await?)
    }
}
