use crate::models::{NetworkQuality, PreloadableVideo};

/// A pure, stateless decision function for which upcoming videos to warm
/// (spec §4.7). Implementations must not hold hidden state.
pub trait PreloadStrategy: Send + Sync {
    fn videos_to_preload(
        &self,
        playlist: &[PreloadableVideo],
        current_index: usize,
        network_quality: NetworkQuality,
    ) -> Vec<PreloadableVideo>;
}

/// The default strategy: warm a small, network-aware window of videos ahead
/// of the current playlist position.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentVideoStrategy;

impl PreloadStrategy for AdjacentVideoStrategy {
    fn videos_to_preload(
        &self,
        playlist: &[PreloadableVideo],
        current_index: usize,
        network_quality: NetworkQuality,
    ) -> Vec<PreloadableVideo> {
        if current_index >= playlist.len() || playlist.len() <= 1 {
            return Vec::new();
        }
        if network_quality == NetworkQuality::Offline {
            return Vec::new();
        }

        let lookahead = if network_quality == NetworkQuality::Poor {
            1
        } else {
            2
        };

        playlist
            .iter()
            .skip(current_index + 1)
            .take(lookahead)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(n: usize) -> Vec<PreloadableVideo> {
        (0..n)
            .map(|i| PreloadableVideo::new(format!("v{i}"), format!("uri://{i}")))
            .collect()
    }

    #[test]
    fn excellent_network_preloads_two_ahead() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(4);
        let result = strategy.videos_to_preload(&videos, 0, NetworkQuality::Excellent);
        assert_eq!(result, vec![videos[1].clone(), videos[2].clone()]);
    }

    #[test]
    fn poor_network_preloads_one_ahead() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(4);
        let result = strategy.videos_to_preload(&videos, 0, NetworkQuality::Poor);
        assert_eq!(result, vec![videos[1].clone()]);
    }

    #[test]
    fn offline_preloads_nothing() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(4);
        let result = strategy.videos_to_preload(&videos, 0, NetworkQuality::Offline);
        assert!(result.is_empty());
    }

    #[test]
    fn out_of_bounds_index_preloads_nothing() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(4);
        let result = strategy.videos_to_preload(&videos, 10, NetworkQuality::Excellent);
        assert!(result.is_empty());
    }

    #[test]
    fn lookahead_is_bounded_by_playlist_length() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(2);
        let result = strategy.videos_to_preload(&videos, 0, NetworkQuality::Excellent);
        assert_eq!(result, vec![videos[1].clone()]);
    }

    #[test]
    fn single_video_playlist_preloads_nothing() {
        let strategy = AdjacentVideoStrategy;
        let videos = playlist(1);
        let result = strategy.videos_to_preload(&videos, 0, NetworkQuality::Excellent);
        assert!(result.is_empty());
    }
}
