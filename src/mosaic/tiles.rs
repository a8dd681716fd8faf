//! Donor photos turned into fixed-size tiles with cached average colours

use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{ExtensionMatching, is_supported_image, load_rgb};
use crate::io::progress::{ProgressEvent, ProgressReporter};
use crate::mosaic::color::{AverageColor, image_average};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the square cut out of a non-square donor is anchored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SquareCrop {
    /// Top-left corner at pixel (0, 0)
    #[default]
    Origin,
    /// Square centred on the longer axis
    Centered,
}

impl SquareCrop {
    /// Top-left corner of the largest square inside a `width` x `height` image
    pub const fn origin(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Origin => (0, 0),
            Self::Centered => {
                let side = if width < height { width } else { height };
                ((width - side) / 2, (height - side) / 2)
            }
        }
    }
}

/// Settings that shape how donors become tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileOptions {
    /// Crop anchor for non-square donors
    pub crop: SquareCrop,
    /// Extension matching used to reject unsupported donors
    pub extensions: ExtensionMatching,
}

/// A square donor image scaled to the tile size
#[derive(Debug, Clone)]
pub struct Tile {
    image: RgbImage,
    average: AverageColor,
    brightness: u8,
    source: PathBuf,
}

impl Tile {
    /// Crop a square out of `image`, shrink it to `tile_size` and profile its colour
    ///
    /// # Errors
    ///
    /// Returns an error if `tile_size` is zero or the image has no pixels
    pub fn from_image(
        image: &RgbImage,
        tile_size: u32,
        crop: SquareCrop,
        source: impl Into<PathBuf>,
    ) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"tiles need at least one pixel per side",
            ));
        }
        let side = image.width().min(image.height());
        if side == 0 {
            return Err(invalid_parameter(
                "image",
                &format!("{}x{}", image.width(), image.height()),
                &"donor image is empty",
            ));
        }

        let (x, y) = crop.origin(image.width(), image.height());
        let square = imageops::crop_imm(image, x, y, side, side).to_image();
        let scaled = imageops::resize(&square, tile_size, tile_size, FilterType::Nearest);
        let average = image_average(&scaled);

        Ok(Self {
            image: scaled,
            average,
            brightness: average.brightness(),
            source: source.into(),
        })
    }

    /// Decode a donor from disk and turn it into a tile
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or is empty
    pub fn from_path(path: &Path, tile_size: u32, crop: SquareCrop) -> Result<Self> {
        let image = load_rgb(path)?;
        Self::from_image(&image, tile_size, crop, path)
    }

    /// Pixels of the tile, `size()` on each side
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Cached sparse average colour
    pub const fn average(&self) -> AverageColor {
        self.average
    }

    /// Cached mean of the three channel averages
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Donor path the tile was built from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Side length in pixels
    pub fn size(&self) -> u32 {
        self.image.width()
    }
}

/// Ordered set of tiles searched during matching
///
/// Insertion order follows the donor order and breaks ties between equally
/// close tiles. Tiles are never removed individually; the whole library is
/// rebuilt when the donor set or tile size changes.
#[derive(Debug, Clone, Default)]
pub struct TileLibrary {
    tiles: Vec<Tile>,
    tile_size: u32,
    donors: Vec<PathBuf>,
}

impl TileLibrary {
    /// Build a library from donor paths, skipping donors that cannot be used
    ///
    /// Reports `built/total` after every donor; `total` shrinks by one for
    /// each rejected donor.
    pub fn build(
        donors: &[PathBuf],
        tile_size: u32,
        options: TileOptions,
        progress: &mut dyn ProgressReporter,
    ) -> Self {
        let mut tiles = Vec::with_capacity(donors.len());
        let mut total = donors.len();

        for path in donors {
            match Self::install(path, tile_size, options) {
                Ok(tile) => {
                    debug!(path = %path.display(), "tile installed");
                    tiles.push(tile);
                }
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "donor skipped");
                    total -= 1;
                }
            }
            progress.report(&ProgressEvent::TileInstalled {
                built: tiles.len(),
                total,
            });
        }

        Self {
            tiles,
            tile_size,
            donors: donors.to_vec(),
        }
    }

    /// Assemble a library from tiles that were already built
    pub fn from_tiles(tile_size: u32, tiles: Vec<Tile>) -> Self {
        let donors = tiles.iter().map(|tile| tile.source.clone()).collect();
        Self {
            tiles,
            tile_size,
            donors,
        }
    }

    fn install(path: &Path, tile_size: u32, options: TileOptions) -> Result<Tile> {
        if !is_supported_image(path, options.extensions) {
            return Err(invalid_parameter(
                "donor",
                &path.display(),
                &"only jpg, jpeg and png donors are supported",
            ));
        }
        Tile::from_path(path, tile_size, options.crop)
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no donor produced a tile
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile side length the library was built for
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Donor paths the library was built from, in the order offered
    pub fn donors(&self) -> &[PathBuf] {
        &self.donors
    }

    /// All tiles in insertion order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at `index`
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// The most recently inserted tile
    pub fn last(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// Whether this library can be reused for `donors` at `tile_size`
    pub fn is_built_for(&self, donors: &[PathBuf], tile_size: u32) -> bool {
        self.tile_size == tile_size && self.donors == donors
    }
}
