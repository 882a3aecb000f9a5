//! Audio Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ArtifactStorePort;
use crate::application::presenter::content_type_for;
use crate::application::queries::audio_queries::{GetAudioQuery, GetAudioResponse};
use crate::domain::pipeline::AudioLocator;

/// GetAudio Handler - 解析定位符并读取音频
pub struct GetAudioHandler {
    artifact_store: Arc<dyn ArtifactStorePort>,
}

impl GetAudioHandler {
    pub fn new(artifact_store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { artifact_store }
    }

    pub async fn handle(&self, query: GetAudioQuery) -> Result<GetAudioResponse, ApplicationError> {
        // 非法定位符与不存在的定位符一样，属于客户端可纠正的错误
        let locator = AudioLocator::parse(query.locator.as_str()).map_err(|e| {
            tracing::debug!(locator = %query.locator, error = %e, "Rejected audio locator");
            ApplicationError::artifact_not_found(query.locator.as_str())
        })?;

        let audio_data = self.artifact_store.get(&locator).await?;

        Ok(GetAudioResponse {
            audio_data,
            content_type: content_type_for(&locator),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::InMemoryArtifactStore;

    #[tokio::test]
    async fn test_get_stored_audio() {
        let store = Arc::new(InMemoryArtifactStore::new());
        let locator = store.put(b"RIFF-audio").await.unwrap();
        let handler = GetAudioHandler::new(store);

        let response = handler
            .handle(GetAudioQuery {
                locator: locator.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.audio_data, b"RIFF-audio");
        assert_eq!(response.content_type, "audio/wav");
    }

    #[tokio::test]
    async fn test_missing_audio_is_not_found() {
        let handler = GetAudioHandler::new(Arc::new(InMemoryArtifactStore::new()));

        let err = handler
            .handle(GetAudioQuery {
                locator: "nonexistent.wav".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ArtifactNotFound(l) if l == "nonexistent.wav"));
    }

    #[tokio::test]
    async fn test_malformed_locator_is_not_found() {
        let handler = GetAudioHandler::new(Arc::new(InMemoryArtifactStore::new()));

        let err = handler
            .handle(GetAudioQuery {
                locator: "../secrets.wav".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ArtifactNotFound(_)));
    }
}
