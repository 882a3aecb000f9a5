//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod stage_services;

#[cfg(test)]
pub(crate) mod testing;

pub use artifact_store::{
    ArtifactInfo, ArtifactStoreError, ArtifactStorePort, ReapResult, StoreStats,
};
pub use stage_services::{
    GenerationPort, RetrievalPort, SpeechToTextPort, StagePorts, SynthesisPort,
};
