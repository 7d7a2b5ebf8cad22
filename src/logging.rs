//! Structured log entries routed to a host-supplied [`Logger`] capability
//! (spec §6/§9). `tracing` remains the library-internal diagnostic channel;
//! this module is the contract a host composes at construction time to
//! receive the same events through its own telemetry pipeline.
//!
//! Dispatch is fire-and-forget over a bounded queue that drops the *oldest*
//! entry on overflow (spec §9 open question: "Task.detached... specify
//! fire-and-forget with bounded queue, drop oldest on overflow"), grounded on
//! `reel/src/events/event_bus.rs`'s background-drained queue with an overflow
//! counter.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::models::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    pub subsystem: String,
    pub category: String,
    pub correlation_id: Option<String>,
    pub session_id: Option<SessionId>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, context: LogContext) -> Self {
        Self {
            level,
            message: message.into(),
            context,
        }
    }
}

/// A host-supplied log destination (spec §6). Opaque to the core.
#[async_trait]
pub trait Logger: Send + Sync {
    async fn log(&self, entry: LogEntry);
}

const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct Queue {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    notify: Notify,
}

/// Dispatches [`LogEntry`] values to a [`Logger`] on a background task,
/// filtering below a minimum level and dropping the oldest queued entry on
/// overflow rather than blocking the caller.
pub struct LogDispatcher {
    queue: Arc<Queue>,
    min_level: LogLevel,
    dropped: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LogDispatcher {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self::with_capacity(logger, min_level, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(logger: Arc<dyn Logger>, min_level: LogLevel, capacity: usize) -> Self {
        let queue = Arc::new(Queue {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            notify: Notify::new(),
        });
        let dropped = Arc::new(AtomicU64::new(0));

        let worker_queue = queue.clone();
        let worker = tokio::spawn(async move {
            loop {
                let entry = loop {
                    if let Some(entry) = worker_queue.entries.lock().unwrap().pop_front() {
                        break entry;
                    }
                    worker_queue.notify.notified().await;
                };
                logger.log(entry).await;
            }
        });

        Self {
            queue,
            min_level,
            dropped,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Enqueues `entry` for dispatch, or drops it silently if `entry.level`
    /// is below `min_level`. Never blocks.
    pub fn record(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let mut entries = self.queue.entries.lock().unwrap();
        if entries.len() >= self.queue.capacity {
            entries.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(entry);
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

impl Drop for LogDispatcher {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
    }
}
