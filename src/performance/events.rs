use crate::models::{MemoryPressureLevel, NetworkQuality};
use serde::{Deserialize, Serialize};

/// Inputs accepted by [`super::monitor::PerformanceMonitor::record_event`]
/// (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PerformanceEvent {
    LoadStarted,
    FirstFrameRendered,
    BufferingStarted,
    BufferingEnded { duration_s: f64 },
    PlaybackStalled,
    PlaybackResumed,
    QualityChanged { bps: u32 },
    MemoryWarning { level: MemoryPressureLevel },
    NetworkChanged { quality: NetworkQuality },
    BytesTransferred { bytes: u64, duration_s: f64 },
}
