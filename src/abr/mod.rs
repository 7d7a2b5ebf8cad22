//! Adaptive bitrate decision strategies (spec §4.6). Stateless by design:
//! callers pass the current bitrate, buffer health, network quality and
//! rebuffering ratio on every call.

mod conservative;
mod strategy;

pub use conservative::ConservativeBitrateStrategy;
pub use strategy::BitrateStrategy;
