//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：语音问答请求

mod voice_query_commands;

pub mod handlers;

pub use voice_query_commands::*;
