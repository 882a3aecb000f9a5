//! HTTP Handlers

mod audio;
mod health;
mod voice;

pub use audio::*;
pub use health::*;
pub use voice::*;
