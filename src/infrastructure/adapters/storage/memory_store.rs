//! In-Memory Artifact Store
//!
//! 进程内临时存储，进程退出即丢失；用于本地开发和测试。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{ArtifactInfo, ArtifactStoreError, ArtifactStorePort};
use crate::domain::pipeline::AudioLocator;

const ARTIFACT_EXTENSION: &str = "wav";

#[derive(Debug, Clone)]
struct StoredArtifact {
    data: Arc<Vec<u8>>,
    created_at: DateTime<Utc>,
}

/// 内存产物存储
#[derive(Default)]
pub struct InMemoryArtifactStore {
    /// locator -> artifact
    artifacts: DashMap<AudioLocator, StoredArtifact>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定定位符写入（模拟 TTS 服务写入共享存储）
    pub fn insert(&self, locator: AudioLocator, data: Vec<u8>) {
        self.insert_at(locator, data, Utc::now());
    }

    fn insert_at(&self, locator: AudioLocator, data: Vec<u8>, created_at: DateTime<Utc>) {
        self.artifacts.insert(
            locator,
            StoredArtifact {
                data: Arc::new(data),
                created_at,
            },
        );
    }
}

#[async_trait]
impl ArtifactStorePort for InMemoryArtifactStore {
    async fn put(&self, data: &[u8]) -> Result<AudioLocator, ArtifactStoreError> {
        loop {
            let locator = AudioLocator::generate(ARTIFACT_EXTENSION);
            if let Entry::Vacant(slot) = self.artifacts.entry(locator.clone()) {
                slot.insert(StoredArtifact {
                    data: Arc::new(data.to_vec()),
                    created_at: Utc::now(),
                });
                tracing::debug!(locator = %locator, size = data.len(), "Stored artifact in memory");
                return Ok(locator);
            }
        }
    }

    async fn get(&self, locator: &AudioLocator) -> Result<Vec<u8>, ArtifactStoreError> {
        self.artifacts
            .get(locator)
            .map(|a| a.data.as_ref().clone())
            .ok_or_else(|| ArtifactStoreError::NotFound(locator.to_string()))
    }

    async fn exists(&self, locator: &AudioLocator) -> bool {
        self.artifacts.contains_key(locator)
    }

    async fn delete(&self, locator: &AudioLocator) -> Result<bool, ArtifactStoreError> {
        Ok(self.artifacts.remove(locator).is_some())
    }

    async fn list(&self) -> Result<Vec<ArtifactInfo>, ArtifactStoreError> {
        Ok(self
            .artifacts
            .iter()
            .map(|entry| ArtifactInfo {
                locator: entry.key().clone(),
                size_bytes: entry.value().data.len() as u64,
                created_at: entry.value().created_at,
            })
            .collect())
    }
}
