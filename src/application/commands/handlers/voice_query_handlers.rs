//! Voice Query Command Handler - 流水线编排器
//!
//! STT → RAG → LLM → TTS 严格串行：上一阶段的输出原样作为下一阶段的输入。
//! 任一阶段失败即整体失败，不重试、不返回部分结果。

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::application::commands::SubmitVoiceQuery;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    GenerationPort, RetrievalPort, SpeechToTextPort, StagePorts, SynthesisPort,
};
use crate::application::presenter;
use crate::domain::pipeline::{PipelineResult, PipelineState, StageError, VoiceRequest};

/// 单次请求的状态机实例，只在处理该请求的任务内存在
struct PipelineRun {
    request_id: Uuid,
    state: PipelineState,
    started_at: Instant,
    stage_started_at: Instant,
}

impl PipelineRun {
    fn new(request_id: Uuid) -> Self {
        let now = Instant::now();
        Self {
            request_id,
            state: PipelineState::Received,
            started_at: now,
            stage_started_at: now,
        }
    }

    fn advance(&mut self) {
        let Some(next) = self.state.advance() else {
            return;
        };
        if let Some(stage) = self.state.active_stage() {
            tracing::debug!(
                stage = %stage,
                elapsed_ms = self.stage_started_at.elapsed().as_millis() as u64,
                "Stage completed"
            );
        }
        tracing::debug!(from = %self.state, to = %next, "Pipeline state changed");
        self.state = next;
        self.stage_started_at = Instant::now();
    }

    fn fail(&mut self, error: StageError) -> StageError {
        if let Some(failed) = self.state.fail(error.stage) {
            self.state = failed;
        }
        tracing::warn!(
            request_id = %self.request_id,
            state = %self.state,
            kind = %error.kind,
            transient = error.transient,
            cause = %error.cause,
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "Voice query failed"
        );
        error
    }
}

/// SubmitVoiceQuery Handler
///
/// 只持有启动时构造的只读阶段句柄，多个请求并发执行互不影响。
pub struct SubmitVoiceQueryHandler {
    stt: Arc<dyn SpeechToTextPort>,
    rag: Arc<dyn RetrievalPort>,
    llm: Arc<dyn GenerationPort>,
    tts: Arc<dyn SynthesisPort>,
}

impl SubmitVoiceQueryHandler {
    pub fn new(stages: StagePorts) -> Self {
        Self {
            stt: stages.stt,
            rag: stages.rag,
            llm: stages.llm,
            tts: stages.tts,
        }
    }

    pub async fn handle(
        &self,
        command: SubmitVoiceQuery,
    ) -> Result<PipelineResult, ApplicationError> {
        if command.request.is_empty() {
            return Err(ApplicationError::validation("audio payload is empty"));
        }

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("voice_query", request_id = %request_id);

        self.run(request_id, command.request)
            .instrument(span)
            .await
            .map_err(ApplicationError::from)
    }

    async fn run(
        &self,
        request_id: Uuid,
        request: VoiceRequest,
    ) -> Result<PipelineResult, StageError> {
        let mut run = PipelineRun::new(request_id);

        tracing::info!(
            audio_size = request.len(),
            content_type = %request.content_type(),
            filename = %request.filename(),
            "Voice query received"
        );

        run.advance();
        let transcript = self
            .stt
            .transcribe(request)
            .await
            .map_err(|e| run.fail(e))?;

        if transcript.is_blank() {
            tracing::debug!("Transcript is blank, forwarding unchanged");
        }
        tracing::info!(transcript = %transcript.as_str(), "Transcript received");

        run.advance();
        let context = self
            .rag
            .retrieve(&transcript)
            .await
            .map_err(|e| run.fail(e))?;

        tracing::info!(
            passages = context.passages().len(),
            "Context retrieved"
        );

        run.advance();
        let answer = self
            .llm
            .generate(&transcript, &context)
            .await
            .map_err(|e| run.fail(e))?;

        tracing::info!(response_len = answer.as_str().len(), "Response generated");

        run.advance();
        let locator = self
            .tts
            .synthesize(&answer)
            .await
            .map_err(|e| run.fail(e))?;

        run.advance();
        tracing::info!(
            audio_file = %locator,
            elapsed_ms = run.started_at.elapsed().as_millis() as u64,
            "Voice query completed"
        );

        Ok(presenter::present(transcript, answer, &locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::testing::{StageCall, StubStages};
    use crate::domain::pipeline::{Stage, StageErrorKind, NO_CONTEXT_MARKER};
    use std::time::Duration;

    fn wav_request() -> SubmitVoiceQuery {
        SubmitVoiceQuery {
            request: VoiceRequest::new(
                b"RIFF....WAVEfmt ".to_vec(),
                "audio/wav",
                Some("question.wav".to_string()),
            ),
        }
    }

    fn docker_stages() -> StubStages {
        StubStages::succeeding(
            "what is docker",
            "Docker is a containerization platform.",
            "Docker packages apps with their dependencies.",
            "abc123.wav",
        )
    }

    #[tokio::test]
    async fn test_end_to_end_result() {
        let stubs = docker_stages();
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let result = handler.handle(wav_request()).await.unwrap();

        assert_eq!(
            result,
            PipelineResult {
                transcript: "what is docker".to_string(),
                response_text: "Docker packages apps with their dependencies.".to_string(),
                audio_url: "/audio/abc123.wav".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_stages_run_in_order_with_verbatim_inputs() {
        let stubs = docker_stages();
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        handler.handle(wav_request()).await.unwrap();

        assert_eq!(
            stubs.log.calls(),
            vec![
                StageCall::Stt {
                    filename: "question.wav".to_string(),
                    content_type: "audio/wav".to_string(),
                    audio: b"RIFF....WAVEfmt ".to_vec(),
                },
                StageCall::Rag {
                    query: "what is docker".to_string(),
                },
                StageCall::Llm {
                    query: "what is docker".to_string(),
                    context: "Docker is a containerization platform.".to_string(),
                },
                StageCall::Tts {
                    text: "Docker packages apps with their dependencies.".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stt_timeout_stops_pipeline() {
        let stubs = docker_stages()
            .failing_with(StageError::timeout(Stage::Stt, Duration::from_secs(60)));
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let err = handler.handle(wav_request()).await.unwrap_err();

        match err {
            ApplicationError::Stage(e) => {
                assert_eq!(e.stage, Stage::Stt);
                assert_eq!(e.kind, StageErrorKind::StageTimeout);
                assert!(e.transient);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stubs.log.stages(), vec![Stage::Stt]);
    }

    #[tokio::test]
    async fn test_rag_failure_skips_llm_and_tts() {
        let stubs = docker_stages()
            .failing_with(StageError::unreachable(Stage::Rag, "connection refused"));
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let err = handler.handle(wav_request()).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Stage(StageError { stage: Stage::Rag, .. })
        ));
        assert_eq!(stubs.log.count(Stage::Stt), 1);
        assert_eq!(stubs.log.count(Stage::Rag), 1);
        assert_eq!(stubs.log.count(Stage::Llm), 0);
        assert_eq!(stubs.log.count(Stage::Tts), 0);
    }

    #[tokio::test]
    async fn test_tts_failure_discards_text_results() {
        let stubs =
            docker_stages().failing_with(StageError::rejected(Stage::Tts, "HTTP 500: boom"));
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let err = handler.handle(wav_request()).await.unwrap_err();

        match err {
            ApplicationError::Stage(e) => {
                assert_eq!(e.stage, Stage::Tts);
                assert_eq!(e.kind, StageErrorKind::StageRejected);
                assert!(!e.transient);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stubs.log.stages(), Stage::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_forwarded() {
        let stubs = StubStages::succeeding("", "", "I did not catch that.", "silence.wav");
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let result = handler.handle(wav_request()).await.unwrap();

        assert_eq!(result.transcript, "");
        assert_eq!(
            stubs.log.calls()[1..3].to_vec(),
            vec![
                StageCall::Rag {
                    query: String::new(),
                },
                StageCall::Llm {
                    query: String::new(),
                    context: NO_CONTEXT_MARKER.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected_before_any_stage() {
        let stubs = docker_stages();
        let handler = SubmitVoiceQueryHandler::new(stubs.ports());

        let err = handler
            .handle(SubmitVoiceQuery {
                request: VoiceRequest::new(Vec::new(), "audio/wav", None),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(stubs.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let stubs = docker_stages();
        let handler = Arc::new(SubmitVoiceQueryHandler::new(stubs.ports()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(wav_request()).await })
            })
            .collect();

        for task in tasks {
            let result = task.await.unwrap().unwrap();
            assert_eq!(result.audio_url, "/audio/abc123.wav");
        }
        assert_eq!(stubs.log.count(Stage::Tts), 8);
    }
}
