//! Polls an injected [`MemoryReader`], classifies pressure, and publishes
//! changes (spec §4.8). Grounded on `reel/src/cache/stats.rs`'s
//! background-poll-loop style, adapted to hold a single `Mutex`-guarded
//! "last observed state" rather than independent atomics, since classifying
//! pressure needs a joint read of available/total bytes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::capability::MemoryReader;
use crate::clock::Clock;
use crate::models::{MemoryPressureLevel, MemoryState};
use crate::pubsub::BroadcastPublisher;

/// Thresholds for classifying a [`MemoryState`] reading into a pressure
/// level, expressed as the fraction of total memory still available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryThresholds {
    pub warning_available_fraction: f64,
    pub critical_available_fraction: f64,
}

impl Default for MemoryThresholds {
    fn default() -> Self {
        Self {
            warning_available_fraction: 0.15,
            critical_available_fraction: 0.05,
        }
    }
}

impl MemoryThresholds {
    fn classify(&self, state: &MemoryState) -> MemoryPressureLevel {
        if state.total_bytes == 0 {
            return MemoryPressureLevel::Normal;
        }
        let available_fraction = state.available_bytes as f64 / state.total_bytes as f64;
        if available_fraction <= self.critical_available_fraction {
            MemoryPressureLevel::Critical
        } else if available_fraction <= self.warning_available_fraction {
            MemoryPressureLevel::Warning
        } else {
            MemoryPressureLevel::Normal
        }
    }
}

/// A callback invoked, in registration order, whenever pressure crosses
/// upward into [`MemoryPressureLevel::Warning`] or [`MemoryPressureLevel::Critical`].
pub type CleanupCallback = Box<dyn Fn(MemoryPressureLevel) + Send + Sync>;

struct Inner {
    last_state: Option<MemoryState>,
    last_level: MemoryPressureLevel,
}

/// Periodically samples memory, classifies pressure, and republishes state
/// and pressure transitions to subscribers.
pub struct MemoryMonitor {
    reader: Arc<dyn MemoryReader>,
    thresholds: MemoryThresholds,
    clock: Clock,
    inner: Mutex<Inner>,
    state_publisher: BroadcastPublisher<MemoryState>,
    pressure_publisher: BroadcastPublisher<MemoryPressureLevel>,
    cleanup_callbacks: Mutex<Vec<CleanupCallback>>,
}

impl MemoryMonitor {
    pub fn new(reader: Arc<dyn MemoryReader>, thresholds: MemoryThresholds, clock: Clock) -> Self {
        Self {
            reader,
            thresholds,
            clock,
            inner: Mutex::new(Inner {
                last_state: None,
                last_level: MemoryPressureLevel::Normal,
            }),
            state_publisher: BroadcastPublisher::default(),
            pressure_publisher: BroadcastPublisher::default(),
            cleanup_callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Registers a cleanup callback. Callbacks run in registration order
    /// whenever pressure crosses upward into `Warning` or `Critical`; they
    /// never run on a downward transition or while pressure stays flat.
    pub fn register_cleanup(&self, callback: CleanupCallback) {
        self.cleanup_callbacks.lock().unwrap().push(callback);
    }

    pub fn current_state(&self) -> Option<MemoryState> {
        self.inner.lock().unwrap().last_state
    }

    pub fn current_pressure(&self) -> MemoryPressureLevel {
        self.inner.lock().unwrap().last_level
    }

    pub fn subscribe_state(&self) -> tokio::sync::broadcast::Receiver<MemoryState> {
        self.state_publisher.subscribe()
    }

    pub fn subscribe_pressure(&self) -> tokio::sync::broadcast::Receiver<MemoryPressureLevel> {
        self.pressure_publisher.subscribe()
    }

    /// Takes one reading, updates cached state, and runs cleanup callbacks if
    /// pressure just increased. Returns the observed level.
    pub async fn poll_once(&self) -> MemoryPressureLevel {
        let mut state = self.reader.read().await;
        state.timestamp = (self.clock)();
        let level = self.thresholds.classify(&state);

        let previous_level = {
            let mut inner = self.inner.lock().unwrap();
            let previous = inner.last_level;
            inner.last_state = Some(state);
            inner.last_level = level;
            previous
        };

        self.state_publisher.publish(state);
        if level != previous_level {
            debug!(?previous_level, ?level, "memory pressure changed");
            self.pressure_publisher.publish(level);
        }
        if level > previous_level && level >= MemoryPressureLevel::Warning {
            for callback in self.cleanup_callbacks.lock().unwrap().iter() {
                callback(level);
            }
        }

        level
    }

    /// Spawns a background task that calls [`Self::poll_once`] on `interval`
    /// until the returned handle is aborted or dropped.
    pub fn spawn_polling(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                monitor.poll_once().await;
            }
        })
    }
}
