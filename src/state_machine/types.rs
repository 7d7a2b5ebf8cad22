use crate::models::Uri;
use serde::{Deserialize, Serialize};

/// Kinds of playback failure, each with a fixed recoverability (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackErrorKind {
    NetworkError,
    DecodingError,
    LoadFailed,
    DrmError,
    Timeout,
}

impl PlaybackErrorKind {
    pub fn is_recoverable(self) -> bool {
        match self {
            PlaybackErrorKind::NetworkError => true,
            PlaybackErrorKind::LoadFailed => true,
            PlaybackErrorKind::Timeout => true,
            PlaybackErrorKind::DecodingError => false,
            PlaybackErrorKind::DrmError => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackError {
    pub kind: PlaybackErrorKind,
    pub reason: String,
}

impl PlaybackError {
    pub fn new(kind: PlaybackErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

/// The state a `Buffering` or `Seeking` node will restore to once its episode
/// ends. Only `Playing` and `Paused` are valid "previous" states (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeState {
    Playing,
    Paused,
}

/// Canonical playback lifecycle state (spec §3). Equality is structural:
/// `Buffering`/`Seeking` carry their resume target as part of their identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Loading { source: Uri },
    Ready,
    Playing,
    Paused,
    Buffering { previous: ResumeState },
    Seeking { target_seconds: f64, previous: ResumeState },
    Ended,
    Failed { error: PlaybackError },
}

impl PlaybackState {
    pub fn resume_state(&self) -> PlaybackState {
        match self {
            PlaybackState::Buffering { previous } | PlaybackState::Seeking { previous, .. } => {
                match previous {
                    ResumeState::Playing => PlaybackState::Playing,
                    ResumeState::Paused => PlaybackState::Paused,
                }
            }
            other => other.clone(),
        }
    }
}

/// User intents and system/player/external signals accepted by the state
/// machine (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackAction {
    // User intents
    Load(Uri),
    Play,
    Pause,
    Seek(f64),
    Stop,
    Retry,

    // Player signals
    DidBecomeReady,
    DidStartPlaying,
    DidPause,
    DidStartBuffering,
    DidFinishBuffering,
    DidStartSeeking,
    DidFinishSeeking,
    DidReachEnd,
    DidFail(PlaybackError),

    // External signals
    DidEnterBackground,
    DidBecomeActive,
    AudioSessionInterrupted,
    AudioSessionResumed,
}

/// A validated, accepted transition (spec §4.1). Only emitted when `send`
/// accepts the action; `from == to` is allowed, but [`PlaybackTransition::did_change_state`]
/// reports `false` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackTransition {
    pub from: PlaybackState,
    pub to: PlaybackState,
    pub action: PlaybackAction,
    pub timestamp: f64,
}

impl PlaybackTransition {
    pub fn did_change_state(&self) -> bool {
        self.from != self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffering_states_with_different_previous_are_unequal() {
        let a = PlaybackState::Buffering {
            previous: ResumeState::Playing,
        };
        let b = PlaybackState::Buffering {
            previous: ResumeState::Paused,
        };
        assert_ne!(a, b);
    }

    #[test]
    fn error_recoverability_is_fixed_per_kind() {
        assert!(PlaybackErrorKind::NetworkError.is_recoverable());
        assert!(!PlaybackErrorKind::DrmError.is_recoverable());
    }

    #[test]
    fn transition_same_state_reports_no_change() {
        let t = PlaybackTransition {
            from: PlaybackState::Ready,
            to: PlaybackState::Ready,
            action: PlaybackAction::DidBecomeReady,
            timestamp: 0.0,
        };
        assert!(!t.did_change_state());
    }
}
