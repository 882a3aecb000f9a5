//! Storage Adapter - 音频产物存储实现

mod file_store;
mod memory_store;

pub use file_store::FileArtifactStore;
pub use memory_store::InMemoryArtifactStore;
