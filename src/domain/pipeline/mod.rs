//! Pipeline Context - 语音问答流水线限界上下文
//!
//! 职责:
//! - 流水线各阶段产物（Transcript / RetrievedContext / AnswerText / AudioLocator）
//! - 阶段状态机（Received → ... → Completed / Failed）
//! - 阶段错误分类

mod errors;
mod state;
mod value_objects;

pub use errors::{Stage, StageError, StageErrorKind};
pub use state::PipelineState;
pub use value_objects::{
    AnswerText, AudioLocator, LocatorError, PipelineResult, RetrievedContext, Transcript,
    VoiceRequest, DEFAULT_AUDIO_FILENAME, NO_CONTEXT_MARKER,
};
