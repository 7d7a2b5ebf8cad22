use crate::models::{BitrateDecision, BitrateLevel, NetworkQuality};

/// A stateless adaptive-bitrate policy (spec §4.6). Implementations must
/// treat `available_levels` as sorted ascending by bps and never recommend a
/// level outside that list.
pub trait BitrateStrategy: Send + Sync {
    fn initial_bitrate(&self, quality: NetworkQuality, levels: &[BitrateLevel]) -> BitrateLevel;

    fn should_upgrade(
        &self,
        current: &BitrateLevel,
        levels: &[BitrateLevel],
        buffer_health: f64,
        network_quality: NetworkQuality,
    ) -> Option<BitrateLevel>;

    fn should_downgrade(
        &self,
        current: &BitrateLevel,
        levels: &[BitrateLevel],
        rebuffering_ratio: f64,
        network_quality: NetworkQuality,
    ) -> Option<BitrateDecision>;
}
