//! Average colours and the sparse sampler used for tiles and grid cells

use crate::io::configuration::{SAMPLE_STRIDE, SIMILARITY_TOLERANCE};
use image::RgbImage;

/// Integer mean of the red, green and blue channels of a region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AverageColor {
    /// Mean red channel
    pub red: u8,
    /// Mean green channel
    pub green: u8,
    /// Mean blue channel
    pub blue: u8,
}

impl AverageColor {
    /// Create an average from its three channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create an average from an `[r, g, b]` triple
    pub const fn from_array(rgb: [u8; 3]) -> Self {
        let [red, green, blue] = rgb;
        Self::new(red, green, blue)
    }

    /// The channels as an `[r, g, b]` triple
    pub const fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Mean of the three channels, truncated
    pub const fn brightness(self) -> u8 {
        ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as u8
    }

    /// Unweighted squared Euclidean distance in RGB space
    pub const fn squared_distance(self, other: Self) -> u32 {
        let dr = self.red.abs_diff(other.red) as u32;
        let dg = self.green.abs_diff(other.green) as u32;
        let db = self.blue.abs_diff(other.blue) as u32;
        dr * dr + dg * dg + db * db
    }

    /// Every channel is at or above `threshold`
    pub const fn is_at_least(self, threshold: u8) -> bool {
        self.red >= threshold && self.green >= threshold && self.blue >= threshold
    }

    /// Channels differ by less than the similarity tolerance
    pub const fn is_similar(self, other: Self) -> bool {
        self.red.abs_diff(other.red) < SIMILARITY_TOLERANCE
            && self.green.abs_diff(other.green) < SIMILARITY_TOLERANCE
            && self.blue.abs_diff(other.blue) < SIMILARITY_TOLERANCE
    }
}

/// Average colour of a rectangular region using a diagonal sparse sample
///
/// Row `j` visits columns `j % 2, j % 2 + 2, ...`, so roughly half the pixels
/// contribute. The sums are divided by the number of samples actually taken.
/// Pixels outside the image are skipped and not counted; an empty region
/// averages to black.
pub fn sparse_average(image: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> AverageColor {
    let mut sums = [0u64; 3];
    let mut samples = 0u64;

    for row in 0..height {
        let offset = row % SAMPLE_STRIDE;
        for col in (offset..width).step_by(SAMPLE_STRIDE as usize) {
            let Some(pixel) = image.get_pixel_checked(x + col, y + row) else {
                continue;
            };
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(channel);
            }
            samples += 1;
        }
    }

    if samples == 0 {
        return AverageColor::default();
    }

    let [red, green, blue] = sums.map(|sum| (sum / samples) as u8);
    AverageColor::new(red, green, blue)
}

/// Average colour of a whole image using the sparse sample
pub fn image_average(image: &RgbImage) -> AverageColor {
    sparse_average(image, 0, 0, image.width(), image.height())
}
