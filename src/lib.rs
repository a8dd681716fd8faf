//! Photomosaic renderer: rebuilds images and video frames out of donor photo tiles
//!
//! Donor photos are cropped square, shrunk to a common tile size and profiled
//! by average colour. A source frame is fitted to the target resolution,
//! cut into a grid of tile-sized cells, and every cell is replaced by the tile
//! whose average colour is closest.

#![forbid(unsafe_code)]

/// Input/output operations, configuration and error handling
pub mod io;
/// Tile library, colour matching and canvas compositing
pub mod mosaic;
/// Boundary with the external video decoder and encoder
pub mod video;

pub use io::error::{MosaicError, Result};
pub use mosaic::session::{RenderConfig, RenderOutcome, RenderRequest, RenderSession};
