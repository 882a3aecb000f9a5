//! HTTP LLM Client - 调用外部回答生成服务
//!
//! POST {llm}/respond
//! Request: {"query": "...", "context": "..."}
//! Response: {"response": "..."}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StageClient, StageEndpoint};
use crate::application::ports::GenerationPort;
use crate::domain::pipeline::{AnswerText, RetrievedContext, Stage, StageError, Transcript};

const RESPOND_PATH: &str = "/respond";

#[derive(Debug, Serialize)]
struct RespondRequest<'a> {
    query: &'a str,
    context: String,
}

#[derive(Debug, Deserialize)]
struct RespondResponse {
    response: String,
}

/// HTTP LLM 客户端
pub struct HttpLlmClient {
    client: StageClient,
    endpoint: StageEndpoint,
}

impl HttpLlmClient {
    pub fn new(client: StageClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: StageEndpoint::new(Stage::Llm, base_url, timeout),
        }
    }
}

#[async_trait]
impl GenerationPort for HttpLlmClient {
    async fn generate(
        &self,
        transcript: &Transcript,
        context: &RetrievedContext,
    ) -> Result<AnswerText, StageError> {
        let request = RespondRequest {
            query: transcript.as_str(),
            context: context.to_prompt_block(),
        };

        let response: RespondResponse = self
            .client
            .call_json(&self.endpoint, RESPOND_PATH, &request)
            .await?;

        Ok(AnswerText::new(response.response))
    }

    async fn health_check(&self) -> bool {
        self.client.probe(&self.endpoint).await
    }
}
