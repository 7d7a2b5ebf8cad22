use crate::models::{MemoryPressureLevel, NetworkQuality, SessionId};
use serde::{Deserialize, Serialize};

/// A point-in-time read of session health, published after every accepted
/// [`super::events::PerformanceEvent`] (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub timestamp: f64,
    pub session_id: SessionId,
    pub time_to_first_frame: Option<f64>,
    pub is_buffering: bool,
    pub buffering_count: u32,
    pub total_buffering_duration: f64,
    pub current_buffering_duration: Option<f64>,
    pub current_bitrate: Option<u32>,
    pub network_quality: NetworkQuality,
    pub memory_mb: f64,
    pub memory_pressure: MemoryPressureLevel,
    pub session_start: f64,
}

impl PerformanceSnapshot {
    /// `total_buffering_duration / (timestamp - session_start)`, zero if the
    /// denominator is zero.
    pub fn rebuffering_ratio(&self) -> f64 {
        let session_duration = self.timestamp - self.session_start;
        if session_duration <= 0.0 {
            0.0
        } else {
            self.total_buffering_duration / session_duration
        }
    }

    pub fn is_healthy(&self) -> bool {
        let startup_ok = self
            .time_to_first_frame
            .map(|ttff| ttff < 3.0)
            .unwrap_or(true);
        self.rebuffering_ratio() < 0.05
            && self.memory_pressure == MemoryPressureLevel::Normal
            && startup_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(timestamp: f64, session_start: f64, total_buffering_duration: f64) -> PerformanceSnapshot {
        PerformanceSnapshot {
            timestamp,
            session_id: SessionId::new("s"),
            time_to_first_frame: None,
            is_buffering: false,
            buffering_count: 0,
            total_buffering_duration,
            current_buffering_duration: None,
            current_bitrate: None,
            network_quality: NetworkQuality::Good,
            memory_mb: 0.0,
            memory_pressure: MemoryPressureLevel::Normal,
            session_start,
        }
    }

    #[test]
    fn rebuffering_ratio_is_zero_when_duration_is_zero() {
        let snapshot = base(10.0, 10.0, 0.0);
        assert_eq!(snapshot.rebuffering_ratio(), 0.0);
    }

    #[test]
    fn rebuffering_ratio_divides_by_session_duration() {
        let snapshot = base(20.0, 10.0, 2.0);
        assert_eq!(snapshot.rebuffering_ratio(), 0.2);
    }

    #[test]
    fn is_healthy_requires_low_ratio_normal_pressure_and_fast_startup() {
        let mut snapshot = base(110.0, 10.0, 1.0); // ratio = 0.01
        snapshot.time_to_first_frame = Some(2.0);
        assert!(snapshot.is_healthy());

        snapshot.time_to_first_frame = Some(5.0);
        assert!(!snapshot.is_healthy());

        snapshot.time_to_first_frame = None;
        assert!(snapshot.is_healthy());

        snapshot.memory_pressure = MemoryPressureLevel::Warning;
        assert!(!snapshot.is_healthy());
    }
}
