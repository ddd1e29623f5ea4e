use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Retrieves the body behind a remote dataset URL.
///
/// Implementations fail on non-success HTTP statuses.
#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<Bytes>;
}
