use super::identifiers::{Uri, VideoId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadableVideo {
    pub id: VideoId,
    pub source: Uri,
    pub estimated_duration: Option<f64>,
}

impl PreloadableVideo {
    pub fn new(id: impl Into<VideoId>, source: impl Into<Uri>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            estimated_duration: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreloadPriority {
    Low = 0,
    Medium = 1,
    High = 2,
    Immediate = 3,
}
