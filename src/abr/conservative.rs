use crate::models::{BitrateDecision, BitrateLevel, DowngradeReason, NetworkQuality};

use super::strategy::BitrateStrategy;

/// The default ABR policy (spec §4.6): biased toward stability over
/// aggressively chasing bandwidth.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeBitrateStrategy;

fn position_of(current: &BitrateLevel, levels: &[BitrateLevel]) -> Option<usize> {
    levels.iter().position(|level| level == current)
}

impl BitrateStrategy for ConservativeBitrateStrategy {
    fn initial_bitrate(&self, quality: NetworkQuality, levels: &[BitrateLevel]) -> BitrateLevel {
        assert!(!levels.is_empty(), "available_levels must be non-empty");
        let len = levels.len();
        let index = match quality {
            NetworkQuality::Offline | NetworkQuality::Poor => 0,
            NetworkQuality::Fair => len / 3,
            NetworkQuality::Good => (2 * len / 3).min(len - 1),
            NetworkQuality::Excellent => len - 1,
        };
        levels[index].clone()
    }

    fn should_upgrade(
        &self,
        current: &BitrateLevel,
        levels: &[BitrateLevel],
        buffer_health: f64,
        network_quality: NetworkQuality,
    ) -> Option<BitrateLevel> {
        let index = position_of(current, levels)?;
        if index + 1 >= levels.len() {
            return None;
        }
        if buffer_health >= 0.7 && network_quality >= NetworkQuality::Good {
            Some(levels[index + 1].clone())
        } else {
            None
        }
    }

    fn should_downgrade(
        &self,
        current: &BitrateLevel,
        levels: &[BitrateLevel],
        rebuffering_ratio: f64,
        network_quality: NetworkQuality,
    ) -> Option<BitrateDecision> {
        let index = position_of(current, levels)?;
        if index == 0 {
            return None;
        }
        let rebuffering_triggered = rebuffering_ratio >= 0.05;
        let network_triggered = network_quality <= NetworkQuality::Poor;
        if !rebuffering_triggered && !network_triggered {
            return None;
        }
        let reason = if rebuffering_triggered {
            DowngradeReason::Rebuffering
        } else {
            DowngradeReason::NetworkDegraded
        };
        Some(BitrateDecision::Downgrade {
            to: levels[index - 1].bits_per_second,
            reason,
        })
    }
}
