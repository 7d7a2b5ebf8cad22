use serde::{Deserialize, Serialize};

/// Tunable cutoffs driving [`super::monitor::PerformanceMonitor`] alert rules
/// (spec §4.5). [`PerformanceThresholds::default`] is the general-purpose
/// profile; [`PerformanceThresholds::streaming`] is a stricter profile for
/// latency-sensitive live sessions (DESIGN.md open question).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub warning_startup_time: f64,
    pub critical_startup_time: f64,
    pub max_buffering_duration: f64,
    pub max_buffering_events_per_minute: u32,
    pub critical_rebuffering_ratio: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            warning_startup_time: 2.0,
            critical_startup_time: 4.0,
            max_buffering_duration: 5.0,
            max_buffering_events_per_minute: 2,
            critical_rebuffering_ratio: 0.05,
        }
    }
}

impl PerformanceThresholds {
    /// Stricter cutoffs appropriate for live/low-latency streaming sessions.
    pub fn streaming() -> Self {
        Self {
            warning_startup_time: 1.5,
            critical_startup_time: 3.0,
            max_buffering_duration: 3.0,
            max_buffering_events_per_minute: 1,
            critical_rebuffering_ratio: 0.03,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_profile_is_stricter_than_default() {
        let default = PerformanceThresholds::default();
        let streaming = PerformanceThresholds::streaming();

        assert!(streaming.warning_startup_time < default.warning_startup_time);
        assert!(streaming.critical_startup_time < default.critical_startup_time);
        assert!(streaming.max_buffering_duration < default.max_buffering_duration);
        assert!(streaming.max_buffering_events_per_minute <= default.max_buffering_events_per_minute);
        assert!(streaming.critical_rebuffering_ratio < default.critical_rebuffering_ratio);
    }
}
