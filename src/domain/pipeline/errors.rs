//! Pipeline Context - Errors

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    #[serde(rename = "STT")]
    Stt,
    #[serde(rename = "RAG")]
    Rag,
    #[serde(rename = "LLM")]
    Llm,
    #[serde(rename = "TTS")]
    Tts,
}

impl Stage {
    /// 按执行顺序排列的全部阶段
    pub const ALL: [Stage; 4] = [Stage::Stt, Stage::Rag, Stage::Llm, Stage::Tts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stt => "STT",
            Self::Rag => "RAG",
            Self::Llm => "LLM",
            Self::Tts => "TTS",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阶段错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageErrorKind {
    /// 调用超出该阶段的超时时间
    StageTimeout,
    /// 无法连接下游服务（连接拒绝、传输中断）
    StageUnreachable,
    /// 下游返回非 2xx 或违反契约的响应体
    StageRejected,
}

impl StageErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StageTimeout => "StageTimeout",
            Self::StageUnreachable => "StageUnreachable",
            Self::StageRejected => "StageRejected",
        }
    }

    /// 重试可能成功的错误（超时、连接失败）
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StageTimeout | Self::StageUnreachable)
    }
}

impl fmt::Display for StageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阶段调用失败
///
/// 每次失败的请求对调用方只呈现一个 StageError，标明失败阶段和底层原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} stage failed ({kind}): {cause}")]
pub struct StageError {
    pub stage: Stage,
    pub kind: StageErrorKind,
    pub cause: String,
    pub transient: bool,
}

impl StageError {
    pub fn new(stage: Stage, kind: StageErrorKind, cause: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            cause: cause.into(),
            transient: kind.is_transient(),
        }
    }

    pub fn timeout(stage: Stage, limit: Duration) -> Self {
        Self::new(
            stage,
            StageErrorKind::StageTimeout,
            format!("no response within {}s", limit.as_secs_f64()),
        )
    }

    pub fn unreachable(stage: Stage, cause: impl Into<String>) -> Self {
        Self::new(stage, StageErrorKind::StageUnreachable, cause)
    }

    pub fn rejected(stage: Stage, cause: impl Into<String>) -> Self {
        Self::new(stage, StageErrorKind::StageRejected, cause)
    }
}
