//! File Artifact Store - 文件系统音频产物存储
//!
//! 实现 ArtifactStorePort trait。目录与 TTS 服务共享：TTS 写入，网关读取。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ArtifactInfo, ArtifactStoreError, ArtifactStorePort};
use crate::domain::pipeline::AudioLocator;

/// 新产物的扩展名
const ARTIFACT_EXTENSION: &str = "wav";

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ArtifactStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir).await?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn artifact_path(&self, locator: &AudioLocator) -> PathBuf {
        self.base_dir.join(locator.as_str())
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn put(&self, data: &[u8]) -> Result<AudioLocator, ArtifactStoreError> {
        // create_new 保证绝不覆盖已有定位符
        let (locator, mut file) = loop {
            let locator = AudioLocator::generate(ARTIFACT_EXTENSION);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.artifact_path(&locator))
                .await
            {
                Ok(file) => break (locator, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        };

        file.write_all(data).await?;
        file.flush().await?;

        tracing::debug!(locator = %locator, size = data.len(), "Saved artifact");

        Ok(locator)
    }

    async fn get(&self, locator: &AudioLocator) -> Result<Vec<u8>, ArtifactStoreError> {
        match fs::read(self.artifact_path(locator)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ArtifactStoreError::NotFound(locator.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, locator: &AudioLocator) -> bool {
        fs::metadata(self.artifact_path(locator))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn delete(&self, locator: &AudioLocator) -> Result<bool, ArtifactStoreError> {
        match fs::remove_file(self.artifact_path(locator)).await {
            Ok(()) => {
                tracing::debug!(locator = %locator, "Deleted artifact");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<ArtifactInfo>, ArtifactStoreError> {
        let mut artifacts = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            // 不可寻址的文件（隐藏文件、非 UTF-8 名称）不属于本存储
            let Some(locator) = entry
                .file_name()
                .to_str()
                .and_then(|name| AudioLocator::parse(name).ok())
            else {
                continue;
            };

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                // 与并发删除竞争，跳过
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let created_at: DateTime<Utc> = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            artifacts.push(ArtifactInfo {
                locator,
                size_bytes: metadata.len(),
                created_at,
            });
        }

        Ok(artifacts)
    }
}
