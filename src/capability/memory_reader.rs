use async_trait::async_trait;

use crate::models::MemoryState;

/// A platform probe for current process/system memory (spec §6), consumed by
/// the Memory Monitor.
#[async_trait]
pub trait MemoryReader: Send + Sync {
    async fn read(&self) -> MemoryState;
}
