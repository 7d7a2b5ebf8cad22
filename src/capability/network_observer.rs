use async_trait::async_trait;

use crate::models::NetworkQuality;

/// Pushes connectivity changes into the Performance Monitor (spec §6). The
/// core never polls; observers call `on_quality_changed` as conditions
/// change.
#[async_trait]
pub trait NetworkObserver: Send + Sync {
    async fn on_quality_changed(&self, quality: NetworkQuality);
}
