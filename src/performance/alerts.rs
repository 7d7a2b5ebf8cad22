use crate::models::{AlertId, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// The condition that triggered a [`PerformanceAlert`] (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertType {
    SlowStartup { duration: f64 },
    FrequentRebuffering { count: u32, ratio: f64 },
    ProlongedBuffering { duration: f64 },
    MemoryPressure { level: crate::models::MemoryPressureLevel },
    NetworkDegradation {
        from: crate::models::NetworkQuality,
        to: crate::models::NetworkQuality,
    },
    PlaybackStalled,
    QualityDowngrade { from_bps: u32, to_bps: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAlert {
    pub id: AlertId,
    pub session_id: SessionId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub timestamp: f64,
    pub message: String,
    pub suggestion: Option<String>,
}
