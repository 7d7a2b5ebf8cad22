//! Tracks buffering episodes and their aggregate counters (spec §4.2).
//!
//! Grounded on `reel/src/cache/stats.rs`'s `DownloaderStats`: plain counters
//! guarded for consistent reads, exposed through a small snapshot struct
//! rather than individual atomics, since `duration` needs the injected clock
//! rather than a free-running `Instant`.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::clock::Clock;

const DEFAULT_HISTORY_SIZE: usize = 100;

/// A single closed buffering episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferingEvent {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Point-in-time snapshot returned by [`RebufferingMonitor::state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebufferingState {
    pub is_buffering: bool,
    pub started_at: Option<f64>,
    pub count: u32,
    pub total_duration: f64,
    pub current_duration: Option<f64>,
}

struct Inner {
    started_at: Option<f64>,
    count: u32,
    total_duration: f64,
    history: VecDeque<BufferingEvent>,
}

/// Synchronous, `Mutex`-guarded episode tracker (DESIGN.md open question 1):
/// every operation here is O(1) and never awaits, so a blocking lock is
/// simpler than routing through the async pubsub machinery used elsewhere.
pub struct RebufferingMonitor {
    inner: Mutex<Inner>,
    clock: Clock,
    max_history: usize,
}

impl RebufferingMonitor {
    pub fn new(clock: Clock) -> Self {
        Self {
            inner: Mutex::new(Inner {
                started_at: None,
                count: 0,
                total_duration: 0.0,
                history: VecDeque::new(),
            }),
            clock,
            max_history: DEFAULT_HISTORY_SIZE,
        }
    }

    /// Idempotent: a second call while already buffering preserves the
    /// original start time.
    pub fn buffering_started(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.started_at.is_none() {
            inner.started_at = Some((self.clock)());
        }
    }

    /// Closes the current episode, or returns `None` if not buffering.
    pub fn buffering_ended(&self) -> Option<BufferingEvent> {
        let mut inner = self.inner.lock().unwrap();
        let start = inner.started_at.take()?;
        let end = (self.clock)();
        let duration = (end - start).max(0.0);

        let event = BufferingEvent {
            start,
            end,
            duration,
        };

        inner.count += 1;
        inner.total_duration += duration;
        inner.history.push_back(event);
        if inner.history.len() > self.max_history {
            inner.history.pop_front();
        }

        Some(event)
    }

    pub fn state(&self) -> RebufferingState {
        let inner = self.inner.lock().unwrap();
        let now = (self.clock)();
        RebufferingState {
            is_buffering: inner.started_at.is_some(),
            started_at: inner.started_at,
            count: inner.count,
            total_duration: inner.total_duration,
            current_duration: inner.started_at.map(|start| (now - start).max(0.0)),
        }
    }

    /// Number of episodes whose `end` falls within the last 60 seconds of the
    /// injected clock.
    pub fn events_in_last_minute(&self) -> u32 {
        let inner = self.inner.lock().unwrap();
        let now = (self.clock)();
        inner
            .history
            .iter()
            .filter(|event| now - event.end <= 60.0)
            .count() as u32
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.started_at = None;
        inner.count = 0;
        inner.total_duration = 0.0;
        inner.history.clear();
    }
}
