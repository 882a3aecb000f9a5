//! HTTP STT Client - 调用外部语音转文字服务
//!
//! POST {stt}/transcribe
//! Request: multipart 字段 `audio`（音频字节 + 文件名 + Content-Type）
//! Response: {"transcript": "..."}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use super::{StageClient, StageEndpoint};
use crate::application::ports::SpeechToTextPort;
use crate::domain::pipeline::{Stage, StageError, Transcript, VoiceRequest};

const TRANSCRIBE_PATH: &str = "/transcribe";

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcript: String,
}

/// HTTP STT 客户端
pub struct HttpSttClient {
    client: StageClient,
    endpoint: StageEndpoint,
}

impl HttpSttClient {
    pub fn new(client: StageClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: StageEndpoint::new(Stage::Stt, base_url, timeout),
        }
    }
}

#[async_trait]
impl SpeechToTextPort for HttpSttClient {
    async fn transcribe(&self, request: VoiceRequest) -> Result<Transcript, StageError> {
        let (audio, content_type, filename) = request.into_parts();

        let part = Part::bytes(audio)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(|e| {
                StageError::rejected(
                    Stage::Stt,
                    format!("Invalid audio content type {:?}: {}", content_type, e),
                )
            })?;
        let form = Form::new().part("audio", part);

        let response: TranscribeResponse = self
            .client
            .call_multipart(&self.endpoint, TRANSCRIBE_PATH, form)
            .await?;

        Ok(Transcript::new(response.transcript))
    }

    async fn health_check(&self) -> bool {
        self.client.probe(&self.endpoint).await
    }
}
