use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::Uri;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetch cancelled")]
    Cancelled,
    #[error("fetch failed: {0}")]
    Failed(String),
}

/// Warms a media source without fully downloading it (spec §6), consumed by
/// the Preload Scheduler. Grounded on `reel`'s `cache::chunk_downloader`
/// range-fetch contract, narrowed to the scheduler's best-effort semantics.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, uri: &Uri, cancellation: CancellationToken) -> Result<(), FetchError>;
}
