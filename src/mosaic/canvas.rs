//! Source fitting, grid partition and tile stamping

use crate::io::configuration::WHITE;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::mosaic::color::sparse_average;
use crate::mosaic::matching::Matcher;
use crate::mosaic::scale::ResolvedScale;
use crate::mosaic::tiles::{Tile, TileLibrary};
use image::imageops;
use image::{Rgb, RgbImage};

/// Output pixel buffer tiles are stamped into
///
/// A canvas may outlive a single render: video frames reuse the previous
/// frame's canvas, so anything a render does not overwrite (the strip past
/// the last full grid column or row) carries over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// White canvas of the given size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(WHITE)),
        }
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Current pixels
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take the pixel buffer
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Copy a tile's pixels with its top-left corner at `(x, y)`
    pub fn stamp(&mut self, tile: &Tile, x: u32, y: u32) {
        imageops::replace(&mut self.image, tile.image(), i64::from(x), i64::from(y));
    }
}

/// Uniform enlargement applied to a source smaller than the target
///
/// Sources at least as large as the target in both directions are not scaled.
pub fn upscale_ratio(source: (u32, u32), target: (u32, u32)) -> f64 {
    let (source_width, source_height) = source;
    let (width, height) = target;
    if source_width == 0 || source_height == 0 {
        return 1.0;
    }
    if source_width < width || source_height < height {
        (f64::from(width) / f64::from(source_width))
            .max(f64::from(height) / f64::from(source_height))
    } else {
        1.0
    }
}

/// Bring a source frame to exactly `width` x `height`
///
/// The source is pasted at the origin of a white buffer (overflow is cut,
/// underflow stays white) and the buffer is then enlarged about the origin
/// by [`upscale_ratio`] with nearest-neighbour sampling.
pub fn fit_source(source: &RgbImage, width: u32, height: u32) -> RgbImage {
    let mut padded = RgbImage::from_pixel(width, height, Rgb(WHITE));
    imageops::replace(&mut padded, source, 0, 0);

    let ratio = upscale_ratio(source.dimensions(), (width, height));
    if ratio <= 1.0 {
        return padded;
    }

    RgbImage::from_fn(width, height, |x, y| {
        let sx = (f64::from(x) / ratio) as u32;
        let sy = (f64::from(y) / ratio) as u32;
        padded
            .get_pixel_checked(sx, sy)
            .copied()
            .unwrap_or(Rgb(WHITE))
    })
}

/// Counts describing one composited frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSummary {
    /// Grid columns stamped
    pub columns: u32,
    /// Grid rows stamped
    pub rows: u32,
}

impl GridSummary {
    /// Total cells stamped
    pub const fn cells(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Match every grid cell of a fitted frame and stamp the chosen tiles
///
/// `frame` must already have the resolved dimensions (see [`fit_source`]).
/// Cells are `scale.factor` pixels square; any remainder strip on the right
/// or bottom edge is left as it was on the canvas.
///
/// # Errors
///
/// Returns [`MosaicError::EmptyTileLibrary`] if the library has no tiles, or
/// an invalid parameter error if the library was built for another tile size
pub fn composite(
    frame: &RgbImage,
    scale: &ResolvedScale,
    library: &TileLibrary,
    matcher: &mut Matcher,
    canvas: &mut Canvas,
) -> Result<GridSummary> {
    let empty = || MosaicError::EmptyTileLibrary {
        offered: library.donors().len(),
    };
    if library.is_empty() {
        return Err(empty());
    }

    let size = scale.factor;
    if library.tile_size() != size {
        return Err(invalid_parameter(
            "scale_factor",
            &size,
            &format!("tile library holds {}px tiles", library.tile_size()),
        ));
    }
    let summary = GridSummary {
        columns: scale.columns(),
        rows: scale.rows(),
    };

    for row in 0..summary.rows {
        for col in 0..summary.columns {
            let (x, y) = (col * size, row * size);
            let color = sparse_average(frame, x, y, size, size);
            let tile = matcher.select(library, color).ok_or_else(empty)?;
            canvas.stamp(tile, x, y);
        }
    }

    Ok(summary)
}
