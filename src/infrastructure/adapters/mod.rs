//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod stages;
pub mod storage;

pub use stages::*;
pub use storage::*;
