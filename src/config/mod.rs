//! Configuration Module
//!
//! 提供应用配置管理功能，支持多层级配置来源：
//! - 部署兼容环境变量（STT_SERVICE_URL 等，最高优先级）
//! - 环境变量（VOXGATE_ 前缀）
//! - 配置文件（TOML 格式）
//! - 默认值（最低优先级）

mod loader;
mod types;

pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use types::{
    AppConfig, GcConfig, LogConfig, ServerConfig, StageConfig, StagesConfig, StorageBackend,
    StorageConfig,
};
