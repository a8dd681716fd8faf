//! The mosaic rendering engine
//!
//! This module contains:
//! - Tile size resolution for a target resolution
//! - Tile library construction from donor photos
//! - Colour matching between grid cells and tiles
//! - Canvas fitting and compositing, driven by a render session

/// Source fitting, grid partition and tile stamping
pub mod canvas;
/// Average colours and sparse sampling
pub mod color;
/// Tile selection strategies
pub mod matching;
/// Render requests and the session owning shared render state
pub mod session;
/// Tile size selection
pub mod scale;
/// Tiles and the tile library
pub mod tiles;

pub use session::RenderSession;
