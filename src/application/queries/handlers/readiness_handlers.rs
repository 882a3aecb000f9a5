//! Readiness Query Handlers

use crate::application::ports::StagePorts;
use crate::application::queries::readiness_queries::{CheckReadiness, ReadinessReport};

/// CheckReadiness Handler - 并发探测四个阶段的 /health
pub struct CheckReadinessHandler {
    stages: StagePorts,
}

impl CheckReadinessHandler {
    pub fn new(stages: StagePorts) -> Self {
        Self { stages }
    }

    pub async fn handle(&self, _query: CheckReadiness) -> ReadinessReport {
        let (stt, rag, llm, tts) = tokio::join!(
            self.stages.stt.health_check(),
            self.stages.rag.health_check(),
            self.stages.llm.health_check(),
            self.stages.tts.health_check(),
        );

        let report = ReadinessReport { stt, rag, llm, tts };
        if !report.is_ready() {
            tracing::warn!(?report, "Downstream stages not ready");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::testing::StubStages;
    use crate::domain::pipeline::Stage;

    #[tokio::test]
    async fn test_all_healthy() {
        let stubs = StubStages::succeeding("q", "c", "a", "x.wav");
        let report = CheckReadinessHandler::new(stubs.ports())
            .handle(CheckReadiness)
            .await;
        assert!(report.is_ready());
        assert!(stubs.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_one_unhealthy_stage() {
        let stubs = StubStages::succeeding("q", "c", "a", "x.wav").unhealthy(Stage::Llm);
        let report = CheckReadinessHandler::new(stubs.ports())
            .handle(CheckReadiness)
            .await;
        assert!(!report.is_ready());
        assert!(!report.llm);
        assert!(report.stt && report.rag && report.tts);
    }
}
