//! Artifact Store Port - 出站端口
//!
//! 定义合成音频产物的存储、读取和过期回收接口

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

use crate::domain::pipeline::AudioLocator;

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ArtifactStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// 产物元数据
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub locator: AudioLocator,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// 存储统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub artifact_count: u64,
    pub used_bytes: u64,
}

/// 回收结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapResult {
    pub deleted: u64,
    pub freed_bytes: u64,
}

/// Artifact Store Port
///
/// 以定位符为键的音频存储。不同请求的并发 put 写入各自全新的键，互不干扰。
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 保存音频，返回在存储生命周期内从未使用过的新定位符
    async fn put(&self, data: &[u8]) -> Result<AudioLocator, ArtifactStoreError>;

    /// 读取音频；不存在时返回 NotFound
    async fn get(&self, locator: &AudioLocator) -> Result<Vec<u8>, ArtifactStoreError>;

    async fn exists(&self, locator: &AudioLocator) -> bool;

    /// 删除音频，返回是否确实删除了内容
    async fn delete(&self, locator: &AudioLocator) -> Result<bool, ArtifactStoreError>;

    /// 列出所有可寻址的产物
    async fn list(&self) -> Result<Vec<ArtifactInfo>, ArtifactStoreError>;

    async fn stats(&self) -> Result<StoreStats, ArtifactStoreError> {
        let artifacts = self.list().await?;
        Ok(StoreStats {
            artifact_count: artifacts.len() as u64,
            used_bytes: artifacts.iter().map(|a| a.size_bytes).sum(),
        })
    }

    /// 删除创建时间早于 max_age 的产物
    async fn reap(&self, max_age: Duration) -> Result<ReapResult, ArtifactStoreError> {
        let max_age = chrono::Duration::from_std(max_age)
            .map_err(|e| ArtifactStoreError::Io(format!("invalid max age: {}", e)))?;
        let cutoff = Utc::now() - max_age;

        let mut result = ReapResult::default();
        for artifact in self.list().await? {
            if artifact.created_at >= cutoff {
                continue;
            }
            if self.delete(&artifact.locator).await? {
                result.deleted += 1;
                result.freed_bytes += artifact.size_bytes;
            }
        }
        Ok(result)
    }
}
