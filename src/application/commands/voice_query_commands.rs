//! Voice Query Commands

use crate::domain::pipeline::VoiceRequest;

/// 提交语音问答命令
#[derive(Debug, Clone)]
pub struct SubmitVoiceQuery {
    pub request: VoiceRequest,
}
