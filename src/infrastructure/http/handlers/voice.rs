//! Voice Query Handler
//!
//! 接收 multipart 表单中的 `audio` 字段，驱动完整的 STT → RAG → LLM → TTS 流水线

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::SubmitVoiceQuery;
use crate::domain::pipeline::{PipelineResult, VoiceRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 表单中承载音频的字段名
const AUDIO_FIELD: &str = "audio";

/// 未声明类型时使用的音频类型
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// 提交语音问题
pub async fn submit_voice_query(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PipelineResult>, ApiError> {
    let mut request: Option<VoiceRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let audio = field.bytes().await.map_err(ApiError::multipart)?.to_vec();

        request = Some(VoiceRequest::new(audio, content_type, filename));
        break;
    }

    let request =
        request.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let result = state
        .submit_voice_query_handler
        .handle(SubmitVoiceQuery { request })
        .await?;

    Ok(Json(result))
}
