//! Background Workers

mod artifact_reaper;

pub use artifact_reaper::{ArtifactReaper, ArtifactReaperConfig};
