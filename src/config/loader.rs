//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 部署兼容变量（STT_SERVICE_URL 等）
//! 2. 环境变量（VOXGATE_ 前缀）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::pipeline::Stage;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 与既有部署（docker-compose）兼容的环境变量 -> 配置键
const DEPLOYMENT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("STT_SERVICE_URL", "stages.stt.url"),
    ("RAG_SERVICE_URL", "stages.rag.url"),
    ("LLM_SERVICE_URL", "stages.llm.url"),
    ("TTS_SERVICE_URL", "stages.tts.url"),
    ("AUDIO_DIR", "storage.audio_dir"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOXGATE_SERVER__PORT=9000`
/// - `VOXGATE_STAGES__RAG__TIMEOUT_SECS=30`
/// - `VOXGATE_STORAGE__BACKEND=memory`
/// - `STT_SERVICE_URL=http://stt-service:8001`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 9000)?
        .set_default("server.max_upload_bytes", 25 * 1024 * 1024)?
        .set_default("stages.stt.url", "http://localhost:8001")?
        .set_default("stages.stt.timeout_secs", 60)?
        .set_default("stages.rag.url", "http://localhost:8002")?
        .set_default("stages.rag.timeout_secs", 30)?
        .set_default("stages.llm.url", "http://localhost:8003")?
        .set_default("stages.llm.timeout_secs", 60)?
        .set_default("stages.tts.url", "http://localhost:8004")?
        .set_default("stages.tts.timeout_secs", 60)?
        .set_default("storage.backend", "file")?
        .set_default("storage.audio_dir", "/app/audio")?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 3600)?
        .set_default("gc.artifact_ttl_secs", 86400)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，层级分隔符 __，例如 VOXGATE_STAGES__TTS__URL
    builder = builder.add_source(
        Environment::with_prefix("VOXGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 部署兼容变量（最高优先级）
    for (var, key) in DEPLOYMENT_ENV_OVERRIDES {
        let value = std::env::var(var).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(*key, value)?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Max upload size cannot be 0".to_string(),
        ));
    }

    for stage in Stage::ALL {
        let stage_config = config.stages.get(stage);
        if stage_config.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} URL cannot be empty",
                stage
            )));
        }
        if !stage_config.url.starts_with("http://") && !stage_config.url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "{} URL must start with http:// or https://: {}",
                stage, stage_config.url
            )));
        }
        if stage_config.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} timeout cannot be 0",
                stage
            )));
        }
    }

    if config.gc.enabled && config.gc.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Upload: {} bytes", config.server.max_upload_bytes);
    for stage in Stage::ALL {
        let stage_config = config.stages.get(stage);
        tracing::info!(
            "{} Service: {} (timeout {}s)",
            stage,
            stage_config.url,
            stage_config.timeout_secs
        );
    }
    tracing::info!("Storage Backend: {:?}", config.storage.backend);
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Artifact TTL: {}s", config.gc.artifact_ttl_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
