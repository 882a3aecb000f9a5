//! Domain Layer - 领域层
//!
//! Pipeline Context: 一次语音问答在四个阶段之间流转的值对象、状态与失败类型

pub mod pipeline;
