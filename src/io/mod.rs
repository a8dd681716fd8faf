/// Command-line parsing and orchestration of a single render
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Media classification, decoding and JPEG export
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress events and their terminal display
pub mod progress;
