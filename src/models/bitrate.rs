//! Bitrate ladder types, generalized from `reel`'s `QualityOption`/`Resolution`
//! pair (`reel/src/models/mod.rs`) to the spec's `BitrateLevel` shape.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single rendition on the bitrate ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitrateLevel {
    pub bits_per_second: u32,
    pub label: String,
}

impl BitrateLevel {
    pub fn new(bits_per_second: u32, label: impl Into<String>) -> Self {
        Self {
            bits_per_second,
            label: label.into(),
        }
    }

    /// The standard ladder referenced informally by spec §3 ("e.g.
    /// 360p/480p/720p/1080p/4K"), fixed here per DESIGN.md open question 4.
    pub fn standard_ladder() -> Vec<BitrateLevel> {
        vec![
            BitrateLevel::new(800_000, "360p"),
            BitrateLevel::new(1_500_000, "480p"),
            BitrateLevel::new(3_000_000, "720p"),
            BitrateLevel::new(6_000_000, "1080p"),
            BitrateLevel::new(20_000_000, "4K"),
        ]
    }
}

impl PartialEq for BitrateLevel {
    fn eq(&self, other: &Self) -> bool {
        self.bits_per_second == other.bits_per_second
    }
}

impl Eq for BitrateLevel {}

impl PartialOrd for BitrateLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitrateLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bits_per_second.cmp(&other.bits_per_second)
    }
}

/// Reasons a [`BitrateDecision::Downgrade`] was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DowngradeReason {
    Rebuffering,
    NetworkDegraded,
    MemoryPressure,
}

/// The ABR engine's recommendation for the next bitrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BitrateDecision {
    Maintain(u32),
    Upgrade { to: u32 },
    Downgrade { to: u32, reason: DowngradeReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_sorted_ascending() {
        let ladder = BitrateLevel::standard_ladder();
        for pair in ladder.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn equality_is_by_bitrate_only() {
        let a = BitrateLevel::new(1_000_000, "a");
        let b = BitrateLevel::new(1_000_000, "b");
        assert_eq!(a, b);
    }
}
