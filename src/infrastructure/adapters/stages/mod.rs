//! Stage Adapters - 四个推理阶段的 HTTP 客户端实现

mod llm_client;
mod rag_client;
mod stage_client;
mod stt_client;
mod tts_client;

pub use llm_client::HttpLlmClient;
pub use rag_client::HttpRagClient;
pub use stage_client::{StageClient, StageEndpoint};
pub use stt_client::HttpSttClient;
pub use tts_client::HttpTtsClient;
