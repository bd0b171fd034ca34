//! Pipeline orchestration

pub mod orchestrator;

pub use orchestrator::{run, PipelineResult, ALBUM_WORKERS};
