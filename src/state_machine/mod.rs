//! The playback lifecycle state machine (spec §4.1).

mod machine;
mod types;

pub use machine::PlaybackStateMachine;
pub use types::{
    PlaybackAction, PlaybackError, PlaybackErrorKind, PlaybackState, PlaybackTransition,
    ResumeState,
};
