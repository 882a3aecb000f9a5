//! HTTP TTS Client - 调用外部语音合成服务
//!
//! POST {tts}/speak
//! Request: {"text": "..."}
//! Response: {"audio_file": "<locator>"}
//!
//! TTS 服务把音频写入与网关共享的音频目录，网关只拿到定位符。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StageClient, StageEndpoint};
use crate::application::ports::SynthesisPort;
use crate::domain::pipeline::{AnswerText, AudioLocator, Stage, StageError};

const SPEAK_PATH: &str = "/speak";

#[derive(Debug, Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpeakResponse {
    audio_file: String,
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: StageClient,
    endpoint: StageEndpoint,
}

impl HttpTtsClient {
    pub fn new(client: StageClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: StageEndpoint::new(Stage::Tts, base_url, timeout),
        }
    }
}

#[async_trait]
impl SynthesisPort for HttpTtsClient {
    async fn synthesize(&self, answer: &AnswerText) -> Result<AudioLocator, StageError> {
        let request = SpeakRequest {
            text: answer.as_str(),
        };

        let response: SpeakResponse = self
            .client
            .call_json(&self.endpoint, SPEAK_PATH, &request)
            .await?;

        AudioLocator::parse(response.audio_file).map_err(|e| {
            StageError::rejected(Stage::Tts, format!("Invalid audio_file locator: {}", e))
        })
    }

    async fn health_check(&self) -> bool {
        self.client.probe(&self.endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::StageErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpTtsClient {
        HttpTtsClient::new(
            StageClient::new().unwrap(),
            server.uri(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_synthesize_returns_locator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speak"))
            .and(body_json(json!({"text": "Docker packages apps with their dependencies."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"audio_file": "abc123.wav"})))
            .expect(1)
            .mount(&server)
            .await;

        let locator = client_for(&server)
            .synthesize(&AnswerText::new("Docker packages apps with their dependencies."))
            .await
            .unwrap();

        assert_eq!(locator.as_str(), "abc123.wav");
    }

    #[tokio::test]
    async fn test_traversal_locator_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speak"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"audio_file": "../../etc/passwd"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .synthesize(&AnswerText::new("hello"))
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Tts);
        assert_eq!(err.kind, StageErrorKind::StageRejected);
    }
}
