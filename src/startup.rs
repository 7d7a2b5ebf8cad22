//! Measures first-frame latency from load start (spec §4.3).

use std::sync::Mutex;

/// Snapshot returned by [`StartupTracker::measurement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupMeasurement {
    pub start: Option<f64>,
    pub first_frame: Option<f64>,
    pub time_to_first_frame: Option<f64>,
    pub is_complete: bool,
}

struct Inner {
    start: Option<f64>,
    first_frame: Option<f64>,
}

/// `Mutex`-guarded set-once timestamps, mirroring [`crate::rebuffering::RebufferingMonitor`]'s
/// synchronous locking style.
pub struct StartupTracker {
    inner: Mutex<Inner>,
}

impl StartupTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                start: None,
                first_frame: None,
            }),
        }
    }

    /// Sets the load-start timestamp once; later calls are ignored.
    pub fn record_load_start(&self, t: f64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.start.is_none() {
            inner.start = Some(t);
        }
    }

    /// Sets the first-frame timestamp once, and only if a start was recorded.
    pub fn record_first_frame(&self, t: f64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.start.is_some() && inner.first_frame.is_none() {
            inner.first_frame = Some(t);
        }
    }

    pub fn measurement(&self) -> StartupMeasurement {
        let inner = self.inner.lock().unwrap();
        let time_to_first_frame = match (inner.start, inner.first_frame) {
            (Some(start), Some(first_frame)) => Some(first_frame - start),
            _ => None,
        };

        StartupMeasurement {
            start: inner.start,
            first_frame: inner.first_frame,
            time_to_first_frame,
            is_complete: inner.start.is_some() && inner.first_frame.is_some(),
        }
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.start = None;
        inner.first_frame = None;
    }
}

impl Default for StartupTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_load_start_call_is_ignored() {
        let tracker = StartupTracker::new();
        tracker.record_load_start(1.0);
        tracker.record_load_start(5.0);
        assert_eq!(tracker.measurement().start, Some(1.0));
    }

    #[test]
    fn first_frame_before_start_is_ignored() {
        let tracker = StartupTracker::new();
        tracker.record_first_frame(2.0);
        let m = tracker.measurement();
        assert!(m.first_frame.is_none());
        assert!(!m.is_complete);
    }

    #[test]
    fn second_first_frame_call_is_ignored() {
        let tracker = StartupTracker::new();
        tracker.record_load_start(1.0);
        tracker.record_first_frame(2.0);
        tracker.record_first_frame(9.0);

        let m = tracker.measurement();
        assert_eq!(m.first_frame, Some(2.0));
        assert_eq!(m.time_to_first_frame, Some(1.0));
        assert!(m.is_complete);
    }

    #[test]
    fn reset_clears_both_timestamps() {
        let tracker = StartupTracker::new();
        tracker.record_load_start(1.0);
        tracker.record_first_frame(2.0);
        tracker.reset();

        let m = tracker.measurement();
        assert!(m.start.is_none());
        assert!(m.first_frame.is_none());
        assert!(!m.is_complete);
    }
}
