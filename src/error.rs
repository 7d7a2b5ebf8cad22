//! Boundary errors.
//!
//! Per spec §7, most rejection paths in this crate are *not* errors: invalid
//! actions return `None`, invalid bandwidth samples are silently dropped, and
//! preload failures are absorbed by the scheduler. [`PlaybackCoreError`] is
//! reserved for the handful of construction/misconfiguration boundaries where
//! a hard failure is the only sane outcome.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackCoreError {
    #[error("preload scheduler concurrency cap must be at least 1")]
    InvalidConcurrencyCap,

    #[error("performance thresholds are invalid: {0}")]
    InvalidThresholds(String),

    #[error("bitrate ladder must be non-empty and sorted by ascending bits_per_second")]
    InvalidBitrateLadder,

    #[error("capability adapter error: {0}")]
    Capability(String),
}

pub type Result<T> = std::result::Result<T, PlaybackCoreError>;
