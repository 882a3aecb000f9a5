//! HTTP Routes
//!
//! API Endpoints:
//! - /voice/query           POST  提交语音问题（multipart 字段 `audio`）
//! - /audio/:locator        GET   回取合成音频
//! - /health                GET   存活探测
//! - /health/ready          GET   就绪探测（检查四个下游阶段）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/voice/query", post(handlers::submit_voice_query))
        .route("/audio/:locator", get(handlers::get_audio))
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::readiness))
}
