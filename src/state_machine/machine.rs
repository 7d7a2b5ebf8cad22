//! The authoritative playback lifecycle model (spec §4.1).
//!
//! Grounded on `reel/src/cache/state_machine.rs`'s `CacheStateMachine`: a
//! `RwLock`-guarded current value, a pure `is_valid_transition` predicate
//! checked before mutation, and a bounded transition history for debugging.
//! Publication is grounded on `reel/src/events/event_bus.rs`'s `EventBus`.

use std::collections::VecDeque;
use std::sync::RwLock;

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::pubsub::{BroadcastPublisher, ReplayPublisher, ReplayReceiver};

use super::types::{PlaybackAction, PlaybackError, PlaybackState, PlaybackTransition, ResumeState};

const DEFAULT_HISTORY_SIZE: usize = 50;

/// Computes the destination state for `(from, action)`, or `None` if the pair
/// is not in the transition table (spec §4.1). Pure and side-effect free so it
/// backs both `send` and `can_perform`.
fn transition_target(from: &PlaybackState, action: &PlaybackAction) -> Option<PlaybackState> {
    use PlaybackAction::*;
    use PlaybackState::*;

    match (from, action) {
        (Idle, Load(u)) => Some(Loading { source: u.clone() }),

        (Loading { .. }, DidBecomeReady) => Some(Ready),
        (Loading { .. }, DidFail(e)) => Some(Failed { error: e.clone() }),
        (Loading { .. }, Stop) => Some(Idle),

        (Ready, Play) => Some(Playing),
        (Ready, Stop) => Some(Idle),
        (Ready, Load(u)) => Some(Loading { source: u.clone() }),

        (Playing, Pause) | (Playing, DidEnterBackground) | (Playing, AudioSessionInterrupted) => {
            Some(Paused)
        }
        (Playing, DidStartBuffering) => Some(Buffering {
            previous: ResumeState::Playing,
        }),
        (Playing, Seek(t)) => Some(Seeking {
            target_seconds: *t,
            previous: ResumeState::Playing,
        }),
        (Playing, DidReachEnd) => Some(Ended),
        (Playing, DidFail(e)) => Some(Failed { error: e.clone() }),
        (Playing, Stop) => Some(Idle),

        (Paused, AudioSessionInterrupted) => None,
        (Paused, Play) | (Paused, AudioSessionResumed) => Some(Playing),
        (Paused, DidStartBuffering) => Some(Buffering {
            previous: ResumeState::Paused,
        }),
        (Paused, Seek(t)) => Some(Seeking {
            target_seconds: *t,
            previous: ResumeState::Paused,
        }),
        (Paused, Stop) => Some(Idle),
        (Paused, Load(u)) => Some(Loading { source: u.clone() }),

        (Buffering { previous }, DidFinishBuffering) => Some(match previous {
            ResumeState::Playing => Playing,
            ResumeState::Paused => Paused,
        }),
        (
            Buffering {
                previous: ResumeState::Playing,
            },
            Pause,
        ) => Some(Buffering {
            previous: ResumeState::Paused,
        }),
        (
            Buffering {
                previous: ResumeState::Paused,
            },
            Play,
        ) => Some(Buffering {
            previous: ResumeState::Playing,
        }),
        (Buffering { .. }, DidFail(e)) => Some(Failed { error: e.clone() }),
        (Buffering { .. }, Stop) => Some(Idle),

        (
            Seeking {
                target_seconds,
                previous,
            },
            DidFinishSeeking,
        ) => {
            let _ = target_seconds;
            Some(match previous {
                ResumeState::Playing => Playing,
                ResumeState::Paused => Paused,
            })
        }
        (
            Seeking {
                target_seconds,
                previous: ResumeState::Playing,
            },
            Pause,
        ) => Some(Seeking {
            target_seconds: *target_seconds,
            previous: ResumeState::Paused,
        }),
        (
            Seeking {
                target_seconds,
                previous: ResumeState::Paused,
            },
            Play,
        ) => Some(Seeking {
            target_seconds: *target_seconds,
            previous: ResumeState::Playing,
        }),
        (Seeking { .. }, DidFail(e)) => Some(Failed { error: e.clone() }),
        (Seeking { .. }, Stop) => Some(Idle),

        (Ended, Play) => Some(Playing),
        // Finishing a replay from the end always restores to Paused: the
        // client must explicitly Play again (spec §4.1, documented choice).
        (Ended, Seek(t)) => Some(Seeking {
            target_seconds: *t,
            previous: ResumeState::Paused,
        }),
        (Ended, Stop) => Some(Idle),
        (Ended, Load(u)) => Some(Loading { source: u.clone() }),

        (Failed { error }, Retry) => {
            if error.is_recoverable() {
                Some(Idle)
            } else {
                None
            }
        }
        (Failed { .. }, Stop) => Some(Idle),
        (Failed { .. }, Load(u)) => Some(Loading { source: u.clone() }),

        _ => None,
    }
}

struct Inner {
    state: PlaybackState,
    history: VecDeque<PlaybackTransition>,
}

/// Owns the current [`PlaybackState`] and validates/applies actions against
/// the transition table. Safe to call from any thread (spec §5); internal
/// mutation is serialized with a single `RwLock`.
pub struct PlaybackStateMachine {
    inner: RwLock<Inner>,
    clock: Clock,
    state_publisher: ReplayPublisher<PlaybackState>,
    transition_publisher: BroadcastPublisher<PlaybackTransition>,
    max_history: usize,
}

impl PlaybackStateMachine {
    pub fn new(clock: Clock) -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: PlaybackState::Idle,
                history: VecDeque::new(),
            }),
            state_publisher: ReplayPublisher::new(32, PlaybackState::Idle),
            transition_publisher: BroadcastPublisher::new(32),
            clock,
            max_history: DEFAULT_HISTORY_SIZE,
        }
    }

    /// Validate and apply `action`. Returns `None` without mutating state if
    /// the action is not accepted from the current state (spec §4.1).
    pub fn send(&self, action: PlaybackAction) -> Option<PlaybackTransition> {
        let mut inner = self.inner.write().unwrap();
        let to = transition_target(&inner.state, &action)?;

        let transition = PlaybackTransition {
            from: inner.state.clone(),
            to: to.clone(),
            action,
            timestamp: (self.clock)(),
        };

        debug!(from = ?transition.from, to = ?transition.to, "playback state transition");

        inner.state = to.clone();
        inner.history.push_back(transition.clone());
        if inner.history.len() > self.max_history {
            inner.history.pop_front();
        }
        drop(inner);

        self.state_publisher.publish(to);
        self.transition_publisher.publish(transition.clone());

        Some(transition)
    }

    pub fn current_state(&self) -> PlaybackState {
        self.inner.read().unwrap().state.clone()
    }

    /// Pure query: would `send(action)` succeed from the current state,
    /// without mutating anything.
    pub fn can_perform(&self, action: &PlaybackAction) -> bool {
        let inner = self.inner.read().unwrap();
        trace!(state = ?inner.state, action = ?action, "checking transition validity");
        transition_target(&inner.state, action).is_some()
    }

    /// State subscription replays the current value immediately, then
    /// forwards every subsequent state (spec §4.1).
    pub fn subscribe_state(&self) -> ReplayReceiver<PlaybackState> {
        self.state_publisher.subscribe()
    }

    /// Transition subscription does not replay (spec §4.1).
    pub fn subscribe_transitions(&self) -> tokio::sync::broadcast::Receiver<PlaybackTransition> {
        self.transition_publisher.subscribe()
    }

    /// Bounded debugging history of recent accepted transitions (DESIGN.md
    /// supplemented feature, grounded on `EventBus::event_history`).
    pub fn recent_transitions(&self) -> Vec<PlaybackTransition> {
        self.inner.read().unwrap().history.iter().cloned().collect()
    }
}
