//! Readiness Queries - 下游服务就绪检查

use serde::Serialize;

/// 检查四个阶段服务是否就绪
#[derive(Debug, Clone, Copy)]
pub struct CheckReadiness;

/// 就绪报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub stt: bool,
    pub rag: bool,
    pub llm: bool,
    pub tts: bool,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.stt && self.rag && self.llm && self.tts
    }
}
