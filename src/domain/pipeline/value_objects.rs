//! Pipeline Context - Value Objects
//!
//! 每个产物只由一个阶段创建、被下一个阶段消费，创建后不可变。

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// 检索结果为空时交给 LLM 的占位上下文
pub const NO_CONTEXT_MARKER: &str = "No relevant context found.";

/// 客户端未提供文件名时转发给 STT 的默认文件名
pub const DEFAULT_AUDIO_FILENAME: &str = "audio.wav";

/// 语音请求 - 原始音频及其声明的类型
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    audio: Vec<u8>,
    content_type: String,
    filename: String,
}

impl VoiceRequest {
    pub fn new(
        audio: Vec<u8>,
        content_type: impl Into<String>,
        filename: Option<String>,
    ) -> Self {
        let filename = filename
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUDIO_FILENAME.to_string());
        Self {
            audio,
            content_type: content_type.into(),
            filename,
        }
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }

    /// 拆解为 (audio, content_type, filename)，交给 STT 阶段
    pub fn into_parts(self) -> (Vec<u8>, String, String) {
        (self.audio, self.content_type, self.filename)
    }
}

/// STT 产出的转写文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空白转写仍然会继续流转，此方法仅供日志使用
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// RAG 检索到的上下文段落（相关度高的在前）
///
/// 不变量:
/// - 段落序列可以为空，但交给 LLM 的文本块永远不为空（以 NO_CONTEXT_MARKER 代替）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrievedContext {
    passages: Vec<String>,
}

impl RetrievedContext {
    pub fn from_passages(passages: Vec<String>) -> Self {
        Self { passages }
    }

    /// 从 RAG 服务返回的换行拼接文本块构造
    pub fn from_block(block: impl Into<String>) -> Self {
        let block = block.into();
        if block.trim().is_empty() {
            return Self::default();
        }
        Self {
            passages: block.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// 拼接成单一文本块，供 LLM prompt 使用
    pub fn to_prompt_block(&self) -> String {
        if self.passages.is_empty() {
            NO_CONTEXT_MARKER.to_string()
        } else {
            self.passages.join("\n")
        }
    }
}

/// LLM 产出的回答文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerText(String);

impl AnswerText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 音频定位符校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("locator is empty")]
    Empty,

    #[error("locator exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("locator contains forbidden characters: {0}")]
    Forbidden(String),
}

/// 音频产物定位符
///
/// 不变量:
/// - 是单一文件名形式的不透明令牌，不含路径分隔符或 `..`
/// - 不以 `.` 开头（隐藏文件与临时文件不可寻址）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioLocator(String);

impl AudioLocator {
    pub const MAX_LEN: usize = 255;

    /// 校验外部传入的定位符（TTS 响应、GET /audio/{locator}）
    pub fn parse(raw: impl Into<String>) -> Result<Self, LocatorError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(LocatorError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(LocatorError::TooLong { max: Self::MAX_LEN });
        }
        if raw.starts_with('.')
            || raw.contains("..")
            || raw
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(LocatorError::Forbidden(raw));
        }
        Ok(Self(raw))
    }

    /// 生成新的随机定位符：`<uuid-v4>.<extension>`
    pub fn generate(extension: &str) -> Self {
        Self(format!("{}.{}", Uuid::new_v4(), extension))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 小写扩展名（无扩展名时为 None）
    pub fn extension(&self) -> Option<String> {
        self.0
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

impl std::fmt::Display for AudioLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 流水线最终结果（对外响应结构）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub transcript: String,
    pub response_text: String,
    pub audio_url: String,
}
