//! Session health aggregation and threshold-driven alerting (spec §4.5).

mod alerts;
mod events;
mod monitor;
mod snapshot;
mod thresholds;

pub use alerts::{AlertSeverity, AlertType, PerformanceAlert};
pub use events::PerformanceEvent;
pub use monitor::PerformanceMonitor;
pub use snapshot::PerformanceSnapshot;
pub use thresholds::PerformanceThresholds;
