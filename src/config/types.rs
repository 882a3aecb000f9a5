//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::pipeline::Stage;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 下游阶段服务配置
    #[serde(default)]
    pub stages: StagesConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 上传音频最大大小（字节）
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024 // 25 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 单个阶段服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// 服务基础 URL
    pub url: String,

    /// 单次调用超时（秒）
    #[serde(default = "default_stage_timeout")]
    pub timeout_secs: u64,
}

fn default_stage_timeout() -> u64 {
    60
}

impl StageConfig {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 四个阶段的服务配置
///
/// 服务拓扑是静态的：地址在进程生命周期内固定
#[derive(Debug, Clone, Deserialize)]
pub struct StagesConfig {
    #[serde(default = "default_stt")]
    pub stt: StageConfig,

    #[serde(default = "default_rag")]
    pub rag: StageConfig,

    #[serde(default = "default_llm")]
    pub llm: StageConfig,

    #[serde(default = "default_tts")]
    pub tts: StageConfig,
}

fn default_stt() -> StageConfig {
    StageConfig::new("http://localhost:8001", 60)
}

fn default_rag() -> StageConfig {
    StageConfig::new("http://localhost:8002", 30)
}

fn default_llm() -> StageConfig {
    StageConfig::new("http://localhost:8003", 60)
}

fn default_tts() -> StageConfig {
    StageConfig::new("http://localhost:8004", 60)
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            stt: default_stt(),
            rag: default_rag(),
            llm: default_llm(),
            tts: default_tts(),
        }
    }
}

impl StagesConfig {
    pub fn get(&self, stage: Stage) -> &StageConfig {
        match stage {
            Stage::Stt => &self.stt,
            Stage::Rag => &self.rag,
            Stage::Llm => &self.llm,
            Stage::Tts => &self.tts,
        }
    }
}

/// 产物存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 目录存储，与 TTS 服务共享
    #[default]
    File,
    /// 进程内存储
    Memory,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// 音频存储目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("/app/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            audio_dir: default_audio_dir(),
        }
    }
}

/// GC（过期音频回收）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用自动 GC
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// GC 间隔时间（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 音频产物存活时间（秒）
    #[serde(default = "default_artifact_ttl")]
    pub artifact_ttl_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    3600 // 1 小时
}

fn default_artifact_ttl() -> u64 {
    86400 // 24 小时
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            artifact_ttl_secs: default_artifact_ttl(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
