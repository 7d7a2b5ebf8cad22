//! Total orders for network quality and memory pressure, following the same
//! derive-`Ord`-on-a-discriminant-enum style as `reel`'s
//! `cache/chunk_manager.rs::Priority`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NetworkQuality {
    Offline = 0,
    Poor = 1,
    Fair = 2,
    Good = 3,
    Excellent = 4,
}

impl NetworkQuality {
    /// Ordinal distance between two quality levels, used to detect a
    /// "degradation by two steps or more" per spec §4.5.
    pub fn distance(self, other: NetworkQuality) -> i32 {
        (self as i32 - other as i32).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_spec() {
        assert!(NetworkQuality::Offline < NetworkQuality::Poor);
        assert!(NetworkQuality::Poor < NetworkQuality::Fair);
        assert!(NetworkQuality::Fair < NetworkQuality::Good);
        assert!(NetworkQuality::Good < NetworkQuality::Excellent);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(
            NetworkQuality::Excellent.distance(NetworkQuality::Fair),
            2
        );
        assert_eq!(
            NetworkQuality::Fair.distance(NetworkQuality::Excellent),
            2
        );
    }
}
