use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// User-facing playback intents and transport-level changes forwarded to
/// analytics (spec §6). Delivery is fire-and-forget with at-most-once
/// guarantees per event — a dropped delivery is never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Seek { from: f64, to: f64 },
    SpeedChanged { rate: f64 },
    VolumeChanged { volume: f64 },
    MuteToggled { muted: bool },
}

/// An opaque analytics destination (spec §6). The core never inspects what
/// the sink does with an event.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: PlaybackEvent, position_seconds: f64);
}

struct QueuedEvent {
    event: PlaybackEvent,
    position_seconds: f64,
}

const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct Queue {
    entries: Mutex<VecDeque<QueuedEvent>>,
    capacity: usize,
    notify: Notify,
}

/// Dispatches [`PlaybackEvent`]s to an [`AnalyticsSink`] on a background task,
/// dropping the oldest queued entry on overflow rather than blocking the
/// caller (spec §9: "Task.detached in decorators for logging and analytics;
/// specify fire-and-forget with bounded queue"), mirroring
/// [`crate::logging::LogDispatcher`].
pub struct AnalyticsDispatcher {
    queue: Arc<Queue>,
    dropped: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AnalyticsDispatcher {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self::with_capacity(sink, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(sink: Arc<dyn AnalyticsSink>, capacity: usize) -> Self {
        let queue = Arc::new(Queue {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            notify: Notify::new(),
        });
        let dropped = Arc::new(AtomicU64::new(0));

        let worker_queue = queue.clone();
        let worker = tokio::spawn(async move {
            loop {
                let queued = loop {
                    if let Some(queued) = worker_queue.entries.lock().unwrap().pop_front() {
                        break queued;
                    }
                    worker_queue.notify.notified().await;
                };
                sink.record(queued.event, queued.position_seconds).await;
            }
        });

        Self {
            queue,
            dropped,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Enqueues `event` for dispatch. Never blocks.
    pub fn record(&self, event: PlaybackEvent, position_seconds: f64) {
        let mut entries = self.queue.entries.lock().unwrap();
        if entries.len() >= self.queue.capacity {
            entries.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(QueuedEvent {
            event,
            position_seconds,
        });
        drop(entries);
        self.queue.notify.notify_one();
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.entries.lock().unwrap().len()
    }
}

impl Drop for AnalyticsDispatcher {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct RecordingSink {
        received: Arc<Mutex<Vec<PlaybackEvent>>>,
    }

    #[async_trait]
    impl AnalyticsSink for RecordingSink {
        async fn record(&self, event: PlaybackEvent, _position_seconds: f64) {
            self.received.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn queued_events_reach_the_sink() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(RecordingSink {
            received: received.clone(),
        });
        let dispatcher = AnalyticsDispatcher::new(sink);

        dispatcher.record(PlaybackEvent::Play, 0.0);
        dispatcher.record(PlaybackEvent::Pause, 12.5);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let entries = received.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], PlaybackEvent::Play);
        assert_eq!(entries[1], PlaybackEvent::Pause);
    }

    #[tokio::test]
    async fn overflow_drops_the_oldest_queued_event() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(RecordingSink {
            received: received.clone(),
        });
        let dispatcher = AnalyticsDispatcher::with_capacity(sink, 2);

        dispatcher.record(PlaybackEvent::Play, 0.0);
        dispatcher.record(PlaybackEvent::Pause, 1.0);
        dispatcher.record(PlaybackEvent::SpeedChanged { rate: 1.5 }, 2.0);

        assert_eq!(dispatcher.dropped_count(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let entries = received.lock().unwrap();
        assert!(!entries.contains(&PlaybackEvent::Play));
        assert!(entries.contains(&PlaybackEvent::Pause));
        assert!(entries.contains(&PlaybackEvent::SpeedChanged { rate: 1.5 }));
    }
}
