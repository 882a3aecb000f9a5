//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：音频获取与就绪探测

mod audio_queries;
mod readiness_queries;

pub mod handlers;

pub use audio_queries::*;
pub use readiness_queries::*;
