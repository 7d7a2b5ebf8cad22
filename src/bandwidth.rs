//! Bounded ring of throughput samples and a smoothed bandwidth estimate
//! (spec §4.4).

use std::collections::VecDeque;
use std::sync::RwLock;

const DEFAULT_MAX_SAMPLES: usize = 30;

/// A single observed download: `bytes` transferred over `duration_seconds`.
/// Rejected by [`BandwidthEstimator::record`] if `duration_seconds <= 0.0` or
/// `bytes == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthSample {
    pub bytes: u64,
    pub duration_seconds: f64,
    pub timestamp: f64,
}

impl BandwidthSample {
    pub fn new(bytes: u64, duration_seconds: f64, timestamp: f64) -> Self {
        Self {
            bytes,
            duration_seconds,
            timestamp,
        }
    }

    fn bits_per_second(&self) -> f64 {
        (self.bytes as f64 * 8.0) / self.duration_seconds
    }

    fn is_valid(&self) -> bool {
        self.bytes > 0 && self.duration_seconds > 0.0
    }
}

/// A smoothed view over the retained samples (spec §4.4 "Estimate formulas").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthEstimate {
    pub avg_bps: f64,
    pub peak_bps: f64,
    pub min_bps: f64,
    pub stability: f64,
    pub confidence: f64,
    pub sample_count: usize,
    pub recommended_max_bitrate: u32,
    pub is_reliable: bool,
}

/// The shape constant of the `n / (n + k)` confidence curve; chosen so that
/// confidence crosses 0.7 at 10 samples and stays below 0.5 for a single one
/// (spec §4.4).
const CONFIDENCE_SHAPE: f64 = 4.0;

/// Bounded ring buffer of recent [`BandwidthSample`]s with derived statistics.
/// `RwLock`-guarded rather than `Mutex`-guarded since `current_estimate` reads
/// are expected to be far more frequent than `record` writes.
pub struct BandwidthEstimator {
    samples: RwLock<VecDeque<f64>>,
    max_samples: usize,
}

impl BandwidthEstimator {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: RwLock::new(VecDeque::new()),
            max_samples: max_samples.max(1),
        }
    }

    /// Appends a sample, rejecting malformed ones and evicting the oldest
    /// once past capacity.
    pub fn record(&self, sample: BandwidthSample) {
        if !sample.is_valid() {
            return;
        }
        let mut samples = self.samples.write().unwrap();
        samples.push_back(sample.bits_per_second());
        if samples.len() > self.max_samples {
            samples.pop_front();
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.read().unwrap().len()
    }

    pub fn clear(&self) {
        self.samples.write().unwrap().clear();
    }

    pub fn current_estimate(&self) -> Option<BandwidthEstimate> {
        let samples = self.samples.read().unwrap();
        if samples.is_empty() {
            return None;
        }

        let n = samples.len();
        let sum: f64 = samples.iter().sum();
        let avg_bps = sum / n as f64;
        let peak_bps = samples.iter().cloned().fold(f64::MIN, f64::max);
        let min_bps = samples.iter().cloned().fold(f64::MAX, f64::min);

        let stability = if n == 1 {
            1.0
        } else {
            let variance =
                samples.iter().map(|bps| (bps - avg_bps).powi(2)).sum::<f64>() / n as f64;
            let std_dev = variance.sqrt();
            let coefficient_of_variation = if avg_bps > 0.0 {
                std_dev / avg_bps
            } else {
                0.0
            };
            (1.0 - coefficient_of_variation).clamp(0.0, 1.0)
        };

        let confidence = n as f64 / (n as f64 + CONFIDENCE_SHAPE);
        let recommended_max_bitrate = (0.7 * min_bps).round() as u32;

        Some(BandwidthEstimate {
            avg_bps,
            peak_bps,
            min_bps,
            stability,
            confidence,
            sample_count: n,
            recommended_max_bitrate,
            is_reliable: stability >= 0.7 && confidence >= 0.7 && n >= 3,
        })
    }
}

impl Default for BandwidthEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}
