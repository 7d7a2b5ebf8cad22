use async_trait::async_trait;

use crate::models::Uri;

/// The platform media player, driven by the state machine and feeding its
/// signals back into it (spec §6). Generalized from `reel`'s `MediaPlayer`
/// trait to the scalar reads the spec calls out, dropping the GTK-specific
/// widget/track surface.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    async fn load(&self, uri: &Uri) -> anyhow::Result<()>;
    async fn play(&self) -> anyhow::Result<()>;
    async fn pause(&self) -> anyhow::Result<()>;
    async fn seek(&self, position_seconds: f64) -> anyhow::Result<()>;

    async fn position(&self) -> Option<f64>;
    async fn duration(&self) -> Option<f64>;
    async fn volume(&self) -> f64;
    async fn is_muted(&self) -> bool;
    async fn playback_rate(&self) -> f64;
}
