//! Drives best-effort warming fetches with priority and cancellation
//! (spec §4.7). Grounded on `reel/src/cache/chunk_manager.rs`'s
//! `HashMap<Key, JoinHandle<_>>` cancellation bookkeeping, generalized from a
//! priority-queue dispatcher to a per-video single-flight map: the spec only
//! requires "one outstanding preload per video id", not FIFO-priority
//! ordering.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::capability::HttpFetcher;
use crate::models::{PreloadPriority, PreloadableVideo, VideoId};

/// Non-`Immediate` preload tasks share this many concurrent fetch slots
/// (DESIGN.md open question 5); `Immediate` priority bypasses the cap
/// entirely.
const DEFAULT_CONCURRENCY_CAP: usize = 3;

struct TaskHandle {
    cancellation: CancellationToken,
    join: JoinHandle<()>,
}

/// Diagnostic counters exposed for observability (spec §7: "preload failures
/// are absorbed... diagnostic counters may be exposed").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadDiagnostics {
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

pub struct PreloadScheduler {
    fetcher: Arc<dyn HttpFetcher>,
    tasks: Mutex<HashMap<VideoId, TaskHandle>>,
    semaphore: Arc<Semaphore>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    cancelled: Arc<AtomicU64>,
}

impl PreloadScheduler {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self::with_concurrency_cap(fetcher, DEFAULT_CONCURRENCY_CAP)
            .expect("DEFAULT_CONCURRENCY_CAP is non-zero")
    }

    /// Fails with [`PlaybackCoreError::InvalidConcurrencyCap`] if `cap == 0`
    /// (spec §7's worked example of a construction-boundary hard error).
    pub fn with_concurrency_cap(
        fetcher: Arc<dyn HttpFetcher>,
        cap: usize,
    ) -> crate::error::Result<Self> {
        if cap == 0 {
            return Err(crate::error::PlaybackCoreError::InvalidConcurrencyCap);
        }
        Ok(Self {
            fetcher,
            tasks: Mutex::new(HashMap::new()),
            semaphore: Arc::new(Semaphore::new(cap)),
            completed: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
            cancelled: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Starts warming `video`. If a task for `video.id` is already running,
    /// it is cancelled first (spec invariant: at most one outstanding
    /// preload per video id).
    pub fn preload(&self, video: PreloadableVideo, priority: PreloadPriority) {
        self.cancel(&video.id);

        let cancellation = CancellationToken::new();
        let task_cancellation = cancellation.clone();
        let fetcher = self.fetcher.clone();
        let semaphore = self.semaphore.clone();
        let completed = self.completed.clone();
        let failed = self.failed.clone();
        let uri = video.source.clone();
        let bypass_cap = priority == PreloadPriority::Immediate;

        let join = tokio::spawn(async move {
            let _permit = if bypass_cap {
                None
            } else {
                match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                }
            };

            if task_cancellation.is_cancelled() {
                return;
            }

            match fetcher.fetch(&uri, task_cancellation.clone()).await {
                Ok(()) => {
                    debug!(uri = %uri, "preload fetch completed");
                    completed.fetch_add(1, Ordering::Relaxed);
                }
                Err(crate::capability::FetchError::Cancelled) => {}
                Err(err) => {
                    warn!(uri = %uri, error = %err, "preload fetch failed");
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        self.tasks.lock().unwrap().insert(
            video.id,
            TaskHandle {
                cancellation,
                join,
            },
        );
    }

    /// No-op if `video_id` has no outstanding task.
    pub fn cancel(&self, video_id: &VideoId) {
        if let Some(task) = self.tasks.lock().unwrap().remove(video_id) {
            task.cancellation.cancel();
            task.join.abort();
            self.cancelled.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Cancels every outstanding task and returns without waiting for them
    /// to finish unwinding (spec §5: "cancel_all returns without waiting").
    pub fn cancel_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap());
        let count = tasks.len();
        for task in tasks.into_values() {
            task.cancellation.cancel();
            task.join.abort();
        }
        self.cancelled.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn diagnostics(&self) -> PreloadDiagnostics {
        PreloadDiagnostics {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct DelayedFetcher {
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpFetcher for DelayedFetcher {
        async fn fetch(
            &self,
            _uri: &crate::models::Uri,
            cancellation: CancellationToken,
        ) -> Result<(), FetchError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            tokio::select! {
                _ = tokio::time::sleep(self.delay) => Ok(()),
                _ = cancellation.cancelled() => Err(FetchError::Cancelled),
            }
        }
    }

    #[tokio::test]
    async fn preloading_same_video_twice_cancels_the_first_task() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = Arc::new(DelayedFetcher {
            delay: Duration::from_millis(200),
            calls: calls.clone(),
        });
        let scheduler = PreloadScheduler::new(fetcher);

        let video = PreloadableVideo::new("v1", "uri://v1");
        scheduler.preload(video.clone(), PreloadPriority::Low);
        scheduler.preload(video.clone(), PreloadPriority::High);

        assert_eq!(scheduler.active_task_count(), 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(scheduler.diagnostics().completed, 1);
    }

    #[test]
    fn zero_concurrency_cap_is_rejected() {
        let fetcher = Arc::new(DelayedFetcher {
            delay: Duration::from_millis(10),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let result = PreloadScheduler::with_concurrency_cap(fetcher, 0);
        assert!(matches!(
            result,
            Err(crate::error::PlaybackCoreError::InvalidConcurrencyCap)
        ));
    }

    #[tokio::test]
    async fn cancel_is_a_no_op_for_unknown_video() {
        let fetcher = Arc::new(DelayedFetcher {
            delay: Duration::from_millis(10),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let scheduler = PreloadScheduler::new(fetcher);
        scheduler.cancel(&VideoId::new("unknown"));
        assert_eq!(scheduler.diagnostics().cancelled, 0);
    }

    #[tokio::test]
    async fn cancel_all_clears_every_task() {
        let fetcher = Arc::new(DelayedFetcher {
            delay: Duration::from_millis(500),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let scheduler = PreloadScheduler::new(fetcher);

        scheduler.preload(PreloadableVideo::new("v1", "uri://1"), PreloadPriority::Low);
        scheduler.preload(PreloadableVideo::new("v2", "uri://2"), PreloadPriority::Low);
        assert_eq!(scheduler.active_task_count(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.active_task_count(), 0);
        assert_eq!(scheduler.diagnostics().cancelled, 2);
    }

    #[tokio::test]
    async fn immediate_priority_bypasses_the_concurrency_cap() {
        let fetcher = Arc::new(DelayedFetcher {
            delay: Duration::from_millis(200),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let scheduler = PreloadScheduler::with_concurrency_cap(fetcher, 1).unwrap();

        scheduler.preload(PreloadableVideo::new("v1", "uri://1"), PreloadPriority::Low);
        scheduler.preload(PreloadableVideo::new("v2", "uri://2"), PreloadPriority::Immediate);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(scheduler.active_task_count(), 2);
    }
}
