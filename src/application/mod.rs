//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（四个阶段服务、音频产物存储）
//! - commands: CQRS 命令及处理器（语音问答流水线）
//! - queries: CQRS 查询及处理器（音频获取、就绪探测）
//! - presenter: 流水线结果组装
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod presenter;
pub mod queries;

// Re-exports
pub use commands::{handlers::SubmitVoiceQueryHandler, SubmitVoiceQuery};

pub use error::ApplicationError;

pub use ports::{
    // Artifact store
    ArtifactInfo,
    ArtifactStoreError,
    ArtifactStorePort,
    ReapResult,
    StoreStats,
    // Stage services
    GenerationPort,
    RetrievalPort,
    SpeechToTextPort,
    StagePorts,
    SynthesisPort,
};

pub use queries::{
    handlers::{CheckReadinessHandler, GetAudioHandler},
    CheckReadiness, GetAudioQuery, GetAudioResponse, ReadinessReport,
};
