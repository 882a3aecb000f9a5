//! Result Presenter
//!
//! 把内部阶段产物组装成对外响应，不做任何 IO。

use crate::domain::pipeline::{AnswerText, AudioLocator, PipelineResult, Transcript};

/// 音频回取路由前缀，与 `GET /audio/{locator}` 对应
pub const AUDIO_ROUTE_PREFIX: &str = "/audio/";

/// 组装流水线结果
pub fn present(
    transcript: Transcript,
    answer_text: AnswerText,
    audio_locator: &AudioLocator,
) -> PipelineResult {
    PipelineResult {
        transcript: transcript.into_inner(),
        response_text: answer_text.into_inner(),
        audio_url: audio_url(audio_locator),
    }
}

pub fn audio_url(locator: &AudioLocator) -> String {
    format!("{}{}", AUDIO_ROUTE_PREFIX, locator)
}

/// 按扩展名推断音频的 Content-Type
pub fn content_type_for(locator: &AudioLocator) -> &'static str {
    match locator.extension().as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
