//! Narrow capability contracts for collaborators supplied at composition time
//! (spec §6). Reified as `async-trait` objects, grounded on `reel`'s
//! `player::traits::MediaPlayer`/`EventHandler`.

mod analytics;
mod http_fetcher;
mod memory_reader;
mod network_observer;
mod player_adapter;

pub use analytics::{AnalyticsDispatcher, AnalyticsSink, PlaybackEvent};
pub use http_fetcher::{FetchError, HttpFetcher};
pub use memory_reader::MemoryReader;
pub use network_observer::NetworkObserver;
pub use player_adapter::PlayerAdapter;
