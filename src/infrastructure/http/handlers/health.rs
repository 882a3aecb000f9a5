//! Health Handlers
//!
//! `/health` 只说明进程存活；`/health/ready` 额外探测四个下游阶段

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{CheckReadiness, ReadinessReport};
use crate::infrastructure::http::dto::HealthResponse;
use crate::infrastructure::http::state::AppState;

/// 存活探测
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// 就绪探测 - 任一阶段不可用时返回 503
pub async fn readiness(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessReport>) {
    let report = state.check_readiness_handler.handle(CheckReadiness).await;
    let status = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
