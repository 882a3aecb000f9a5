//! Stage Service Ports - 四个推理阶段的抽象
//!
//! 具体实现在 infrastructure/adapters/stages，通过 HTTP 调用外部服务。
//! 每次调用恰好对应一次出站请求，不重试。

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::pipeline::{
    AnswerText, AudioLocator, RetrievedContext, StageError, Transcript, VoiceRequest,
};

/// 语音转文字
#[async_trait]
pub trait SpeechToTextPort: Send + Sync {
    /// 转写音频；请求的所有权在此交给 STT 阶段
    async fn transcribe(&self, request: VoiceRequest) -> Result<Transcript, StageError>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// 知识检索
#[async_trait]
pub trait RetrievalPort: Send + Sync {
    async fn retrieve(&self, transcript: &Transcript) -> Result<RetrievedContext, StageError>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// 回答生成
#[async_trait]
pub trait GenerationPort: Send + Sync {
    async fn generate(
        &self,
        transcript: &Transcript,
        context: &RetrievedContext,
    ) -> Result<AnswerText, StageError>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// 语音合成，返回合成音频的定位符
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    async fn synthesize(&self, answer: &AnswerText) -> Result<AudioLocator, StageError>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// 四个阶段的只读句柄集合，启动时构造一次，由所有请求共享
#[derive(Clone)]
pub struct StagePorts {
    pub stt: Arc<dyn SpeechToTextPort>,
    pub rag: Arc<dyn RetrievalPort>,
    pub llm: Arc<dyn GenerationPort>,
    pub tts: Arc<dyn SynthesisPort>,
}
