//! Query Handlers 实现

mod audio_handlers;
mod readiness_handlers;

pub use audio_handlers::*;
pub use readiness_handlers::*;
