//! 测试替身：记录调用顺序与参数的阶段桩

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::{GenerationPort, RetrievalPort, SpeechToTextPort, StagePorts, SynthesisPort};
use crate::domain::pipeline::{
    AnswerText, AudioLocator, RetrievedContext, Stage, StageError, Transcript, VoiceRequest,
};

/// 一次阶段调用及其收到的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageCall {
    Stt {
        filename: String,
        content_type: String,
        audio: Vec<u8>,
    },
    Rag {
        query: String,
    },
    Llm {
        query: String,
        context: String,
    },
    Tts {
        text: String,
    },
}

impl StageCall {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Stt { .. } => Stage::Stt,
            Self::Rag { .. } => Stage::Rag,
            Self::Llm { .. } => Stage::Llm,
            Self::Tts { .. } => Stage::Tts,
        }
    }
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<StageCall>>>);

impl CallLog {
    fn record(&self, call: StageCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<StageCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.calls().iter().map(StageCall::stage).collect()
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.calls().iter().filter(|c| c.stage() == stage).count()
    }
}

/// 可编排结果的四阶段桩
pub struct StubStages {
    pub log: CallLog,
    transcript: Result<String, StageError>,
    context: Result<String, StageError>,
    answer: Result<String, StageError>,
    locator: Result<String, StageError>,
    unhealthy: HashSet<Stage>,
}

impl StubStages {
    pub fn succeeding(transcript: &str, context: &str, answer: &str, locator: &str) -> Self {
        Self {
            log: CallLog::default(),
            transcript: Ok(transcript.to_string()),
            context: Ok(context.to_string()),
            answer: Ok(answer.to_string()),
            locator: Ok(locator.to_string()),
            unhealthy: HashSet::new(),
        }
    }

    /// 让 error.stage 对应的阶段返回该错误
    pub fn failing_with(mut self, error: StageError) -> Self {
        match error.stage {
            Stage::Stt => self.transcript = Err(error),
            Stage::Rag => self.context = Err(error),
            Stage::Llm => self.answer = Err(error),
            Stage::Tts => self.locator = Err(error),
        }
        self
    }

    pub fn unhealthy(mut self, stage: Stage) -> Self {
        self.unhealthy.insert(stage);
        self
    }

    pub fn ports(&self) -> StagePorts {
        StagePorts {
            stt: Arc::new(StubStt {
                log: self.log.clone(),
                outcome: self.transcript.clone(),
                healthy: !self.unhealthy.contains(&Stage::Stt),
            }),
            rag: Arc::new(StubRag {
                log: self.log.clone(),
                outcome: self.context.clone(),
                healthy: !self.unhealthy.contains(&Stage::Rag),
            }),
            llm: Arc::new(StubLlm {
                log: self.log.clone(),
                outcome: self.answer.clone(),
                healthy: !self.unhealthy.contains(&Stage::Llm),
            }),
            tts: Arc::new(StubTts {
                log: self.log.clone(),
                outcome: self.locator.clone(),
                healthy: !self.unhealthy.contains(&Stage::Tts),
            }),
        }
    }
}

struct StubStt {
    log: CallLog,
    outcome: Result<String, StageError>,
    healthy: bool,
}

#[async_trait]
impl SpeechToTextPort for StubStt {
    async fn transcribe(&self, request: VoiceRequest) -> Result<Transcript, StageError> {
        let (audio, content_type, filename) = request.into_parts();
        self.log.record(StageCall::Stt {
            filename,
            content_type,
            audio,
        });
        self.outcome.clone().map(Transcript::new)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

struct StubRag {
    log: CallLog,
    outcome: Result<String, StageError>,
    healthy: bool,
}

#[async_trait]
impl RetrievalPort for StubRag {
    async fn retrieve(&self, transcript: &Transcript) -> Result<RetrievedContext, StageError> {
        self.log.record(StageCall::Rag {
            query: transcript.as_str().to_string(),
        });
        self.outcome.clone().map(RetrievedContext::from_block)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

struct StubLlm {
    log: CallLog,
    outcome: Result<String, StageError>,
    healthy: bool,
}

#[async_trait]
impl GenerationPort for StubLlm {
    async fn generate(
        &self,
        transcript: &Transcript,
        context: &RetrievedContext,
    ) -> Result<AnswerText, StageError> {
        self.log.record(StageCall::Llm {
            query: transcript.as_str().to_string(),
            context: context.to_prompt_block(),
        });
        self.outcome.clone().map(AnswerText::new)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

struct StubTts {
    log: CallLog,
    outcome: Result<String, StageError>,
    healthy: bool,
}

#[async_trait]
impl SynthesisPort for StubTts {
    async fn synthesize(&self, answer: &AnswerText) -> Result<AudioLocator, StageError> {
        self.log.record(StageCall::Tts {
            text: answer.as_str().to_string(),
        });
        let raw = self.outcome.clone()?;
        AudioLocator::parse(raw).map_err(|e| StageError::rejected(Stage::Tts, e.to_string()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}
