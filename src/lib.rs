//! Voxgate - 语音问答网关
//!
//! 接收一段语音问题，依次调用 STT → RAG → LLM → TTS 四个外部服务，
//! 返回转写文本、回答文本以及合成音频的回取地址。
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Pipeline Context: 请求值对象、流水线状态、阶段错误
//!
//! 应用层 (application/):
//! - Ports: 端口定义（四个阶段服务、ArtifactStore）
//! - Commands: 语音问答编排（SubmitVoiceQuery）
//! - Queries: 音频回取、就绪探测
//! - Presenter: 结果组装
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 阶段 HTTP 客户端、文件/内存产物存储
//! - Worker: ArtifactReaper 过期音频回收

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
