//! HTTP RAG Client - 调用外部检索服务
//!
//! POST {rag}/retrieve
//! Request: {"query": "..."}
//! Response: {"context": "..."}（多个段落以换行拼接）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StageClient, StageEndpoint};
use crate::application::ports::RetrievalPort;
use crate::domain::pipeline::{RetrievedContext, Stage, StageError, Transcript};

const RETRIEVE_PATH: &str = "/retrieve";

#[derive(Debug, Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    context: String,
}

/// HTTP RAG 客户端
pub struct HttpRagClient {
    client: StageClient,
    endpoint: StageEndpoint,
}

impl HttpRagClient {
    pub fn new(client: StageClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: StageEndpoint::new(Stage::Rag, base_url, timeout),
        }
    }
}

#[async_trait]
impl RetrievalPort for HttpRagClient {
    async fn retrieve(&self, transcript: &Transcript) -> Result<RetrievedContext, StageError> {
        let request = RetrieveRequest {
            query: transcript.as_str(),
        };

        let response: RetrieveResponse = self
            .client
            .call_json(&self.endpoint, RETRIEVE_PATH, &request)
            .await?;

        Ok(RetrievedContext::from_block(response.context))
    }

    async fn health_check(&self) -> bool {
        self.client.probe(&self.endpoint).await
    }
}
