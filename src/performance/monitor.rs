//! Aggregates the Rebuffering Monitor, Startup Tracker and Bandwidth
//! Estimator into per-session snapshots and threshold-driven alerts
//! (spec §4.5).

use std::sync::RwLock;

use tracing::info;

use crate::bandwidth::{BandwidthEstimate, BandwidthEstimator, BandwidthSample};
use crate::clock::Clock;
use crate::models::{MemoryPressureLevel, NetworkQuality, SessionId};
use crate::pubsub::{BroadcastPublisher, DropNewestPublisher, DropNewestReceiver};
use crate::rebuffering::RebufferingMonitor;
use crate::startup::StartupTracker;

use super::alerts::{AlertSeverity, AlertType, PerformanceAlert};
use super::events::PerformanceEvent;
use super::snapshot::PerformanceSnapshot;
use super::thresholds::PerformanceThresholds;

struct SessionState {
    session_id: SessionId,
    session_start: f64,
    current_bitrate: Option<u32>,
    network_quality: NetworkQuality,
    memory_mb: f64,
    memory_pressure: MemoryPressureLevel,
}

/// Owns the per-session monitors and publishes [`PerformanceSnapshot`]s and
/// [`PerformanceAlert`]s as events are recorded.
pub struct PerformanceMonitor {
    clock: Clock,
    thresholds: PerformanceThresholds,
    session: RwLock<Option<SessionState>>,
    rebuffering: RebufferingMonitor,
    startup: StartupTracker,
    bandwidth: BandwidthEstimator,
    snapshot_publisher: BroadcastPublisher<PerformanceSnapshot>,
    alert_publisher: DropNewestPublisher<PerformanceAlert>,
    network_quality_publisher: BroadcastPublisher<NetworkQuality>,
    bandwidth_publisher: BroadcastPublisher<BandwidthEstimate>,
}

impl PerformanceMonitor {
    pub fn new(clock: Clock, thresholds: PerformanceThresholds) -> Self {
        Self {
            rebuffering: RebufferingMonitor::new(clock.clone()),
            startup: StartupTracker::new(),
            bandwidth: BandwidthEstimator::default(),
            snapshot_publisher: BroadcastPublisher::default(),
            alert_publisher: DropNewestPublisher::default(),
            network_quality_publisher: BroadcastPublisher::default(),
            bandwidth_publisher: BroadcastPublisher::default(),
            clock,
            thresholds,
            session: RwLock::new(None),
        }
    }

    pub fn start_monitoring(&self, session_id: SessionId) {
        self.rebuffering.reset();
        self.startup.reset();
        self.bandwidth.clear();
        *self.session.write().unwrap() = Some(SessionState {
            session_id,
            session_start: (self.clock)(),
            current_bitrate: None,
            network_quality: NetworkQuality::Good,
            memory_mb: 0.0,
            memory_pressure: MemoryPressureLevel::Normal,
        });
    }

    pub fn stop_monitoring(&self) {
        *self.session.write().unwrap() = None;
    }

    pub fn update_network(&self, quality: NetworkQuality) {
        if let Some(session) = self.session.write().unwrap().as_mut() {
            session.network_quality = quality;
        }
        self.network_quality_publisher.publish(quality);
    }

    pub fn update_memory(&self, used_mb: f64, pressure: MemoryPressureLevel) {
        if let Some(session) = self.session.write().unwrap().as_mut() {
            session.memory_mb = used_mb;
            session.memory_pressure = pressure;
        }
    }

    pub fn bandwidth_estimate(&self) -> Option<crate::bandwidth::BandwidthEstimate> {
        self.bandwidth.current_estimate()
    }

    pub fn snapshots(&self) -> tokio::sync::broadcast::Receiver<PerformanceSnapshot> {
        self.snapshot_publisher.subscribe()
    }

    pub fn alerts(&self) -> DropNewestReceiver<PerformanceAlert> {
        self.alert_publisher.subscribe()
    }

    pub fn subscribe_network_quality(&self) -> tokio::sync::broadcast::Receiver<NetworkQuality> {
        self.network_quality_publisher.subscribe()
    }

    pub fn subscribe_bandwidth_estimate(&self) -> tokio::sync::broadcast::Receiver<BandwidthEstimate> {
        self.bandwidth_publisher.subscribe()
    }

    /// Events recorded while no session is active are dropped silently
    /// (spec §4.5).
    pub fn record_event(&self, event: PerformanceEvent) {
        if self.session.read().unwrap().is_none() {
            return;
        }
        let now = (self.clock)();

        match event {
            PerformanceEvent::LoadStarted => {
                self.startup.record_load_start(now);
                self.publish_snapshot();
            }
            PerformanceEvent::FirstFrameRendered => {
                self.startup.record_first_frame(now);
                self.publish_snapshot();

                if let Some(ttff) = self.startup.measurement().time_to_first_frame {
                    if ttff > self.thresholds.critical_startup_time {
                        self.emit_alert(
                            AlertType::SlowStartup { duration: ttff },
                            AlertSeverity::Critical,
                            format!("first frame took {ttff:.2}s to render"),
                            Some("check initial manifest/segment fetch latency".to_string()),
                        );
                    } else if ttff > self.thresholds.warning_startup_time {
                        self.emit_alert(
                            AlertType::SlowStartup { duration: ttff },
                            AlertSeverity::Warning,
                            format!("first frame took {ttff:.2}s to render"),
                            None,
                        );
                    }
                }
            }
            PerformanceEvent::BufferingStarted => {
                self.rebuffering.buffering_started();
                self.publish_snapshot();
            }
            PerformanceEvent::BufferingEnded { duration_s: _ } => {
                let closed = self.rebuffering.buffering_ended();
                let snapshot = self.publish_snapshot();

                if let Some(event) = closed {
                    if event.duration > self.thresholds.max_buffering_duration {
                        self.emit_alert(
                            AlertType::ProlongedBuffering {
                                duration: event.duration,
                            },
                            AlertSeverity::Warning,
                            format!("buffering episode lasted {:.2}s", event.duration),
                            Some("consider a lower initial bitrate".to_string()),
                        );
                    }
                }

                let count = self.rebuffering.events_in_last_minute();
                if count > self.thresholds.max_buffering_events_per_minute {
                    let ratio = snapshot.as_ref().map(|s| s.rebuffering_ratio()).unwrap_or(0.0);
                    self.emit_alert(
                        AlertType::FrequentRebuffering { count, ratio },
                        AlertSeverity::Warning,
                        format!("{count} rebuffering episodes in the last minute"),
                        None,
                    );
                }

                if let Some(snapshot) = snapshot {
                    if snapshot.rebuffering_ratio() > self.thresholds.critical_rebuffering_ratio {
                        self.emit_alert(
                            AlertType::FrequentRebuffering {
                                count,
                                ratio: snapshot.rebuffering_ratio(),
                            },
                            AlertSeverity::Critical,
                            "rebuffering ratio exceeded the critical threshold".to_string(),
                            Some("consider downgrading bitrate".to_string()),
                        );
                    }
                }
            }
            PerformanceEvent::PlaybackStalled => {
                self.publish_snapshot();
                self.emit_alert(
                    AlertType::PlaybackStalled,
                    AlertSeverity::Critical,
                    "playback stalled".to_string(),
                    None,
                );
            }
            PerformanceEvent::PlaybackResumed => {
                self.publish_snapshot();
            }
            PerformanceEvent::QualityChanged { bps } => {
                let previous = self
                    .session
                    .read()
                    .unwrap()
                    .as_ref()
                    .and_then(|s| s.current_bitrate);
                if let Some(session) = self.session.write().unwrap().as_mut() {
                    session.current_bitrate = Some(bps);
                }
                self.publish_snapshot();

                if let Some(previous) = previous {
                    if (bps as f64) < previous as f64 * 0.75 {
                        self.emit_alert(
                            AlertType::QualityDowngrade {
                                from_bps: previous,
                                to_bps: bps,
                            },
                            AlertSeverity::Info,
                            format!("bitrate dropped from {previous} to {bps} bps"),
                            None,
                        );
                    }
                }
            }
            PerformanceEvent::MemoryWarning { level } => {
                if let Some(session) = self.session.write().unwrap().as_mut() {
                    session.memory_pressure = level;
                }
                self.publish_snapshot();

                match level {
                    MemoryPressureLevel::Warning => self.emit_alert(
                        AlertType::MemoryPressure { level },
                        AlertSeverity::Warning,
                        "memory pressure elevated".to_string(),
                        None,
                    ),
                    MemoryPressureLevel::Critical => self.emit_alert(
                        AlertType::MemoryPressure { level },
                        AlertSeverity::Critical,
                        "memory pressure critical".to_string(),
                        Some("free buffered segments and reduce bitrate".to_string()),
                    ),
                    MemoryPressureLevel::Normal => {
                        info!("memory pressure returned to normal");
                    }
                }
            }
            PerformanceEvent::NetworkChanged { quality } => {
                let previous = self
                    .session
                    .read()
                    .unwrap()
                    .as_ref()
                    .map(|s| s.network_quality);
                if let Some(session) = self.session.write().unwrap().as_mut() {
                    session.network_quality = quality;
                }
                self.network_quality_publisher.publish(quality);
                self.publish_snapshot();

                if let Some(previous) = previous {
                    if previous.distance(quality) >= 2 && previous > quality {
                        self.emit_alert(
                            AlertType::NetworkDegradation {
                                from: previous,
                                to: quality,
                            },
                            AlertSeverity::Warning,
                            format!("network quality dropped from {previous:?} to {quality:?}"),
                            None,
                        );
                    }
                }
            }
            PerformanceEvent::BytesTransferred { bytes, duration_s } => {
                self.bandwidth.record(BandwidthSample::new(bytes, duration_s, now));
                if let Some(estimate) = self.bandwidth.current_estimate() {
                    self.bandwidth_publisher.publish(estimate);
                }
                self.publish_snapshot();
            }
        }
    }

    fn publish_snapshot(&self) -> Option<PerformanceSnapshot> {
        let snapshot = self.build_snapshot()?;
        self.snapshot_publisher.publish(snapshot.clone());
        Some(snapshot)
    }

    fn build_snapshot(&self) -> Option<PerformanceSnapshot> {
        let session = self.session.read().unwrap();
        let session = session.as_ref()?;
        let rebuffering = self.rebuffering.state();
        let startup = self.startup.measurement();

        Some(PerformanceSnapshot {
            timestamp: (self.clock)(),
            session_id: session.session_id.clone(),
            time_to_first_frame: startup.time_to_first_frame,
            is_buffering: rebuffering.is_buffering,
            buffering_count: rebuffering.count,
            total_buffering_duration: rebuffering.total_duration,
            current_buffering_duration: rebuffering.current_duration,
            current_bitrate: session.current_bitrate,
            network_quality: session.network_quality,
            memory_mb: session.memory_mb,
            memory_pressure: session.memory_pressure,
            session_start: session.session_start,
        })
    }

    fn emit_alert(
        &self,
        alert_type: AlertType,
        severity: AlertSeverity,
        message: String,
        suggestion: Option<String>,
    ) {
        let Some(session_id) = self.session.read().unwrap().as_ref().map(|s| s.session_id.clone())
        else {
            return;
        };

        let alert = PerformanceAlert {
            id: crate::models::AlertId::new(uuid::Uuid::new_v4().to_string()),
            session_id,
            alert_type,
            severity,
            timestamp: (self.clock)(),
            message,
            suggestion,
        };
        self.alert_publisher.publish(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::StubClock;

    fn monitor_with_clock() -> (PerformanceMonitor, StubClock) {
        let clock = StubClock::new(0.0);
        let monitor = PerformanceMonitor::new(clock.clock(), PerformanceThresholds::default());
        (monitor, clock)
    }

    #[tokio::test]
    async fn happy_path_emits_no_alerts_and_tracks_startup() {
        let (monitor, clock) = monitor_with_clock();
        let mut snapshots = monitor.snapshots();
        let mut alerts = monitor.alerts();

        monitor.start_monitoring(SessionId::new("S"));
        monitor.record_event(PerformanceEvent::LoadStarted);

        clock.advance(1.2);
        monitor.record_event(PerformanceEvent::FirstFrameRendered);
        let snapshot = snapshots.recv().await.unwrap(); // LoadStarted snapshot
        assert!(snapshot.time_to_first_frame.is_none());
        let snapshot = snapshots.recv().await.unwrap(); // FirstFrameRendered snapshot
        assert_eq!(snapshot.time_to_first_frame, Some(1.2));

        monitor.record_event(PerformanceEvent::BytesTransferred {
            bytes: 1_000_000,
            duration_s: 1.0,
        });
        let estimate = monitor.bandwidth_estimate().unwrap();
        assert_eq!(estimate.avg_bps, 8_000_000.0);

        assert!(alerts.try_recv().is_err());
    }

    #[tokio::test]
    async fn slow_startup_emits_warning_alert() {
        let (monitor, clock) = monitor_with_clock();
        let mut alerts = monitor.alerts();

        monitor.start_monitoring(SessionId::new("S"));
        monitor.record_event(PerformanceEvent::LoadStarted);
        clock.advance(3.0);
        monitor.record_event(PerformanceEvent::FirstFrameRendered);

        let alert = alerts.recv().await.unwrap();
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert!(matches!(
            alert.alert_type,
            AlertType::SlowStartup { duration } if duration == 3.0
        ));
    }

    #[tokio::test]
    async fn frequent_rebuffering_emits_warning_after_third_episode() {
        let (monitor, clock) = monitor_with_clock();
        let mut alerts = monitor.alerts();
        monitor.start_monitoring(SessionId::new("S"));

        for _ in 0..3 {
            monitor.record_event(PerformanceEvent::BufferingStarted);
            clock.advance(0.5);
            monitor.record_event(PerformanceEvent::BufferingEnded { duration_s: 0.5 });
            clock.advance(9.5);
        }

        let mut saw_frequent = false;
        while let Ok(alert) = alerts.try_recv() {
            if matches!(alert.alert_type, AlertType::FrequentRebuffering { count: 3, .. }) {
                saw_frequent = true;
            }
        }
        assert!(saw_frequent);
    }

    #[tokio::test]
    async fn events_are_dropped_outside_an_active_session() {
        let (monitor, _clock) = monitor_with_clock();
        let mut snapshots = monitor.snapshots();

        monitor.record_event(PerformanceEvent::LoadStarted);
        assert!(snapshots.try_recv().is_err());
    }

    #[tokio::test]
    async fn quality_downgrade_over_25_percent_emits_info_alert() {
        let (monitor, _clock) = monitor_with_clock();
        let mut alerts = monitor.alerts();
        monitor.start_monitoring(SessionId::new("S"));

        monitor.record_event(PerformanceEvent::QualityChanged { bps: 3_000_000 });
        monitor.record_event(PerformanceEvent::QualityChanged { bps: 1_000_000 });

        let alert = alerts.recv().await.unwrap();
        assert_eq!(alert.severity, AlertSeverity::Info);
        assert!(matches!(alert.alert_type, AlertType::QualityDowngrade { .. }));
    }

    #[tokio::test]
    async fn network_quality_changes_are_published() {
        let (monitor, _clock) = monitor_with_clock();
        let mut quality = monitor.subscribe_network_quality();
        monitor.start_monitoring(SessionId::new("S"));

        monitor.update_network(NetworkQuality::Fair);
        assert_eq!(quality.recv().await.unwrap(), NetworkQuality::Fair);

        monitor.record_event(PerformanceEvent::NetworkChanged {
            quality: NetworkQuality::Good,
        });
        assert_eq!(quality.recv().await.unwrap(), NetworkQuality::Good);
    }

    #[tokio::test]
    async fn bandwidth_estimate_is_published_after_bytes_transferred() {
        let (monitor, _clock) = monitor_with_clock();
        let mut estimates = monitor.subscribe_bandwidth_estimate();
        monitor.start_monitoring(SessionId::new("S"));

        monitor.record_event(PerformanceEvent::BytesTransferred {
            bytes: 1_000_000,
            duration_s: 1.0,
        });

        let estimate = estimates.recv().await.unwrap();
        assert_eq!(estimate.avg_bps, 8_000_000.0);
    }

    #[tokio::test]
    async fn network_degradation_by_two_steps_emits_warning() {
        let (monitor, _clock) = monitor_with_clock();
        let mut alerts = monitor.alerts();
        monitor.start_monitoring(SessionId::new("S"));

        monitor.record_event(PerformanceEvent::NetworkChanged {
            quality: NetworkQuality::Excellent,
        });
        monitor.record_event(PerformanceEvent::NetworkChanged {
            quality: NetworkQuality::Poor,
        });

        let alert = alerts.recv().await.unwrap();
        assert!(matches!(alert.alert_type, AlertType::NetworkDegradation { .. }));
    }
}
