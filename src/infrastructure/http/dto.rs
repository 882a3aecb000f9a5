//! Data Transfer Objects
//!
//! 流水线结果（`PipelineResult`）与就绪报告（`ReadinessReport`）本身可序列化，
//! 这里只放 HTTP 层独有的响应结构。

use serde::Serialize;

/// 存活探测响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
