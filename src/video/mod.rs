//! Video decoding and encoding collaborator

/// Frame extraction and assembly contract, with an ffmpeg implementation
pub mod pipeline;

pub use pipeline::{Ffmpeg, VideoPipeline};
