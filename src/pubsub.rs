//! Generic multi-subscriber publishers, grounded on `reel/src/events/event_bus.rs`'s
//! `EventBus`/`EventSubscriber` (a `tokio::sync::broadcast` channel wrapped in a
//! purpose-built subscriber type rather than a raw `Stream`).
//!
//! Two shapes cover every published stream in spec §5/§6:
//!
//! - [`BroadcastPublisher`] — bounded, drops the oldest undelivered value once
//!   a lagging subscriber's buffer is full (the natural behavior of
//!   `tokio::sync::broadcast`). Used for transitions, snapshots, buffer
//!   configuration, memory state, network quality and bandwidth estimates.
//! - [`ReplayPublisher`] — the same, plus it replays the most recently
//!   published value to a new subscriber immediately. Used only for
//!   `playback_state`, per spec §4.1 ("State subscription replays the current
//!   value on subscribe").
//! - [`DropNewestPublisher`] — drops the *incoming* value (rather than the
//!   oldest buffered one) when a subscriber's queue is full, and exposes an
//!   overflow counter. Used only for `performance_alert`, per spec §5.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::{broadcast, mpsc};

/// Default bounded capacity for per-subscriber delivery buffers.
pub const DEFAULT_CAPACITY: usize = 64;

pub struct BroadcastPublisher<T: Clone + Send + 'static> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> BroadcastPublisher<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, value: T) {
        // No subscribers is normal and not an error.
        let _ = self.sender.send(value);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Send + 'static> Default for BroadcastPublisher<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receiver returned by [`ReplayPublisher::subscribe`]: yields the value that
/// was current at subscribe time first, then forwards live updates.
pub struct ReplayReceiver<T: Clone + Send + 'static> {
    initial: Option<T>,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone + Send + 'static> ReplayReceiver<T> {
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(value) = self.initial.take() {
            return Some(value);
        }
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub struct ReplayPublisher<T: Clone + Send + 'static> {
    sender: broadcast::Sender<T>,
    current: RwLock<T>,
}

impl<T: Clone + Send + 'static> ReplayPublisher<T> {
    pub fn new(capacity: usize, initial: T) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            current: RwLock::new(initial),
        }
    }

    pub fn publish(&self, value: T) {
        *self.current.write().unwrap() = value.clone();
        let _ = self.sender.send(value);
    }

    pub fn current(&self) -> T {
        self.current.read().unwrap().clone()
    }

    pub fn subscribe(&self) -> ReplayReceiver<T> {
        ReplayReceiver {
            initial: Some(self.current()),
            receiver: self.sender.subscribe(),
        }
    }
}

/// A subscriber handle for [`DropNewestPublisher`].
pub type DropNewestReceiver<T> = mpsc::Receiver<T>;

/// Publisher whose overflow policy is "drop the newest value, not the oldest
/// buffered one", with a counter so hosts can alert on it (spec §5).
pub struct DropNewestPublisher<T: Clone + Send + 'static> {
    subscribers: RwLock<Vec<mpsc::Sender<T>>>,
    capacity: usize,
    dropped: AtomicU64,
}

impl<T: Clone + Send + 'static> DropNewestPublisher<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> DropNewestReceiver<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.write().unwrap().push(tx);
        rx
    }

    pub fn publish(&self, value: T) {
        let mut subscribers = self.subscribers.write().unwrap();
        subscribers.retain(|tx| match tx.try_send(value.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Number of values dropped across all subscribers since creation.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T: Clone + Send + 'static> Default for DropNewestPublisher<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
