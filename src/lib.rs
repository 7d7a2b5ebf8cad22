//! Playback control core: state machine, ABR, preload scheduling, bandwidth
//! estimation and performance monitoring for a streaming video client.
//!
//! [`PlaybackCore`] composes the leaf subsystems in dependency order
//! (Bandwidth Estimator / Rebuffering Monitor / Startup Tracker →
//! Performance Monitor → Playback State Machine → ABR Engine / Preload
//! Scheduler), mirroring how the teacher's `PlayerController` wires its
//! `AdaptiveQualityManager` around the lower-level player.

pub mod abr;
pub mod bandwidth;
pub mod buffer;
pub mod capability;
pub mod clock;
pub mod error;
pub mod logging;
pub mod memory;
pub mod models;
pub mod performance;
pub mod preload;
mod pubsub;
pub mod rebuffering;
pub mod startup;
pub mod state_machine;

pub use pubsub::{BroadcastPublisher, DropNewestPublisher, DropNewestReceiver, ReplayPublisher, ReplayReceiver};

use std::sync::Arc;

use abr::{BitrateStrategy, ConservativeBitrateStrategy};
use capability::HttpFetcher;
use clock::Clock;
use models::SessionId;
use performance::{PerformanceMonitor, PerformanceThresholds};
use preload::{AdjacentVideoStrategy, PreloadScheduler, PreloadStrategy};
use state_machine::PlaybackStateMachine;

/// Wires every subsystem into a single owned façade (spec §2's "orchestrator
/// façade"). Each subsystem remains independently usable; this is a
/// convenience for hosts that want one object to hold and pass around.
pub struct PlaybackCore {
    pub state_machine: PlaybackStateMachine,
    pub performance: PerformanceMonitor,
    pub preload: PreloadScheduler,
    bitrate_strategy: Box<dyn BitrateStrategy>,
    preload_strategy: Box<dyn PreloadStrategy>,
}

impl PlaybackCore {
    /// Builds the core with the default conservative ABR strategy, adjacent
    /// preload strategy and default performance thresholds.
    pub fn new(clock: Clock, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self::with_strategies(
            clock,
            fetcher,
            PerformanceThresholds::default(),
            Box::new(ConservativeBitrateStrategy),
            Box::new(AdjacentVideoStrategy),
        )
    }

    pub fn with_strategies(
        clock: Clock,
        fetcher: Arc<dyn HttpFetcher>,
        thresholds: PerformanceThresholds,
        bitrate_strategy: Box<dyn BitrateStrategy>,
        preload_strategy: Box<dyn PreloadStrategy>,
    ) -> Self {
        Self {
            state_machine: PlaybackStateMachine::new(clock.clone()),
            performance: PerformanceMonitor::new(clock, thresholds),
            preload: PreloadScheduler::new(fetcher),
            bitrate_strategy,
            preload_strategy,
        }
    }

    pub fn bitrate_strategy(&self) -> &dyn BitrateStrategy {
        self.bitrate_strategy.as_ref()
    }

    pub fn preload_strategy(&self) -> &dyn PreloadStrategy {
        self.preload_strategy.as_ref()
    }

    /// Starts a monitored playback session; does not itself drive the state
    /// machine, since loading is initiated by the caller via `Load`.
    pub fn start_session(&self, session_id: SessionId) {
        self.performance.start_monitoring(session_id);
    }

    pub fn stop_session(&self) {
        self.performance.stop_monitoring();
        self.preload.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FetchError;
    use crate::clock::test_support::StubClock;
    use async_trait::async_trait;
    use models::Uri;
    use tokio_util::sync::CancellationToken;

    struct NoopFetcher;

    #[async_trait]
    impl HttpFetcher for NoopFetcher {
        async fn fetch(&self, _uri: &Uri, _cancellation: CancellationToken) -> Result<(), FetchError> {
            Ok(())
        }
    }

    #[test]
    fn start_session_activates_performance_monitoring() {
        let clock = StubClock::new(0.0);
        let core = PlaybackCore::new(clock.clock(), Arc::new(NoopFetcher));

        core.start_session(SessionId::new("s1"));
        core.performance.record_event(performance::PerformanceEvent::LoadStarted);
        // No panic and no dropped event implies a session was active.
        core.stop_session();
    }

    #[test]
    fn state_machine_starts_idle() {
        let clock = StubClock::new(0.0);
        let core = PlaybackCore::new(clock.clock(), Arc::new(NoopFetcher));
        assert_eq!(core.state_machine.current_state(), state_machine::PlaybackState::Idle);
    }
}
