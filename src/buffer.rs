//! Publishes the forward-buffer target the player adapter should maintain
//! (spec §4.8), generalized from `reel/src/cache/config.rs`'s
//! profile-with-`Default`-impl style.

use serde::{Deserialize, Serialize};

use crate::pubsub::BroadcastPublisher;

/// How much forward buffer the player should try to keep filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferConfiguration {
    pub preferred_forward_buffer_duration: f64,
}

/// Named tuning profiles (DESIGN.md open question).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferProfile {
    Minimal,
    Default,
    Aggressive,
}

impl BufferConfiguration {
    pub fn for_profile(profile: BufferProfile) -> Self {
        let preferred_forward_buffer_duration = match profile {
            BufferProfile::Minimal => 10.0,
            BufferProfile::Default => 30.0,
            BufferProfile::Aggressive => 60.0,
        };
        Self {
            preferred_forward_buffer_duration,
        }
    }
}

impl Default for BufferConfiguration {
    fn default() -> Self {
        Self::for_profile(BufferProfile::Default)
    }
}

/// Owns the current [`BufferConfiguration`] and republishes it on change.
pub struct BufferManager {
    current: std::sync::RwLock<BufferConfiguration>,
    publisher: BroadcastPublisher<BufferConfiguration>,
}

impl BufferManager {
    pub fn new(initial: BufferConfiguration) -> Self {
        Self {
            current: std::sync::RwLock::new(initial),
            publisher: BroadcastPublisher::default(),
        }
    }

    pub fn current(&self) -> BufferConfiguration {
        *self.current.read().unwrap()
    }

    pub fn update(&self, configuration: BufferConfiguration) {
        *self.current.write().unwrap() = configuration;
        self.publisher.publish(configuration);
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BufferConfiguration> {
        self.publisher.subscribe()
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new(BufferConfiguration::default())
    }
}
