//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::ArtifactStoreError;
use crate::domain::pipeline::StageError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 流水线某阶段失败（整个请求失败，不返回部分结果）
    #[error(transparent)]
    Stage(#[from] StageError),

    /// 音频产物不存在（定位符错误或已过期）
    #[error("Audio artifact not found: {0}")]
    ArtifactNotFound(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建产物不存在错误
    pub fn artifact_not_found(locator: impl Into<String>) -> Self {
        Self::ArtifactNotFound(locator.into())
    }
}

impl From<ArtifactStoreError> for ApplicationError {
    fn from(err: ArtifactStoreError) -> Self {
        match err {
            ArtifactStoreError::NotFound(locator) => Self::ArtifactNotFound(locator),
            ArtifactStoreError::Io(msg) => Self::StorageError(msg),
        }
    }
}
