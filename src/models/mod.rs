//! Shared value types used across every subsystem. Kept free of any
//! subsystem-specific logic; see the individual subsystem modules for the
//! behaviors that operate on these types.

mod bitrate;
mod identifiers;
mod memory;
mod network;
mod preload;

pub use bitrate::{BitrateDecision, BitrateLevel, DowngradeReason};
pub use identifiers::{AlertId, SessionId, Uri, VideoId};
pub use memory::{MemoryPressureLevel, MemoryState};
pub use network::NetworkQuality;
pub use preload::{PreloadPriority, PreloadableVideo};
