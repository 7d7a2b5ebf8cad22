//! Time injection. Every subsystem that needs "now" takes a [`Clock`] instead
//! of calling `Instant::now()` or `SystemTime::now()` directly, so tests can
//! drive deterministic sequences of events.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of monotonically-increasing-in-practice timestamps, expressed as
/// seconds since an arbitrary epoch. Production code injects the wall clock;
/// tests inject a stub that advances on command.
///
/// The clock is not required to be strictly monotonic: callers must not panic
/// if consecutive readings go backwards (see spec §5), only avoid relying on
/// it happening.
pub type Clock = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Build a [`Clock`] backed by the system wall clock.
pub fn system_clock() -> Clock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Clock;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// A clock whose value is set explicitly by tests, stored as
    /// milliseconds to keep comparisons exact.
    pub struct StubClock {
        millis: Arc<AtomicU64>,
    }

    impl StubClock {
        pub fn new(initial_seconds: f64) -> Self {
            Self {
                millis: Arc::new(AtomicU64::new((initial_seconds * 1000.0) as u64)),
            }
        }

        pub fn set(&self, seconds: f64) {
            self.millis.store((seconds * 1000.0) as u64, Ordering::SeqCst);
        }

        pub fn advance(&self, delta_seconds: f64) {
            let delta_millis = (delta_seconds * 1000.0) as u64;
            self.millis.fetch_add(delta_millis, Ordering::SeqCst);
        }

        pub fn clock(&self) -> Clock {
            let millis = self.millis.clone();
            Arc::new(move || millis.load(Ordering::SeqCst) as f64 / 1000.0)
        }
    }
}
