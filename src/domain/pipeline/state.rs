//! Pipeline Context - State Machine

use std::fmt;

use super::Stage;

/// 单次语音问答的流水线状态
///
/// Received → Transcribing → Retrieving → Generating → Synthesizing → Completed
///
/// 任意非终止状态都可进入 Failed(stage)；状态只能前进，不重试也不跳过阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Transcribing,
    Retrieving,
    Generating,
    Synthesizing,
    Completed,
    Failed(Stage),
}

impl PipelineState {
    /// 前进到下一个状态；终止状态返回 None
    pub fn advance(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Transcribing),
            Self::Transcribing => Some(Self::Retrieving),
            Self::Retrieving => Some(Self::Generating),
            Self::Generating => Some(Self::Synthesizing),
            Self::Synthesizing => Some(Self::Completed),
            Self::Completed | Self::Failed(_) => None,
        }
    }

    /// 进入 Failed(stage)；终止状态返回 None
    pub fn fail(self, stage: Stage) -> Option<Self> {
        if self.is_terminal() {
            None
        } else {
            Some(Self::Failed(stage))
        }
    }

    /// 当前正在执行的阶段
    pub fn active_stage(&self) -> Option<Stage> {
        match self {
            Self::Transcribing => Some(Stage::Stt),
            Self::Retrieving => Some(Stage::Rag),
            Self::Generating => Some(Stage::Llm),
            Self::Synthesizing => Some(Stage::Tts),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => f.write_str("Received"),
            Self::Transcribing => f.write_str("Transcribing"),
            Self::Retrieving => f.write_str("Retrieving"),
            Self::Generating => f.write_str("Generating"),
            Self::Synthesizing => f.write_str("Synthesizing"),
            Self::Completed => f.write_str("Completed"),
            Self::Failed(stage) => write!(f, "Failed({})", stage),
        }
    }
}
