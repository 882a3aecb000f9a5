//! Application State
//!
//! 持有所有 Command/Query Handlers，进程启动时构造一次，请求间只读共享

use std::sync::Arc;

use crate::application::{
    ArtifactStorePort, CheckReadinessHandler, GetAudioHandler, StagePorts,
    SubmitVoiceQueryHandler,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub artifact_store: Arc<dyn ArtifactStorePort>,

    // ========== Command Handlers ==========
    pub submit_voice_query_handler: SubmitVoiceQueryHandler,

    // ========== Query Handlers ==========
    pub get_audio_handler: GetAudioHandler,
    pub check_readiness_handler: CheckReadinessHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(stages: StagePorts, artifact_store: Arc<dyn ArtifactStorePort>) -> Self {
        Self {
            artifact_store: artifact_store.clone(),

            submit_voice_query_handler: SubmitVoiceQueryHandler::new(stages.clone()),

            get_audio_handler: GetAudioHandler::new(artifact_store),
            check_readiness_handler: CheckReadinessHandler::new(stages),
        }
    }
}
