//! Tile size selection for a target resolution
//!
//! A tile side length must divide both output dimensions so that the grid
//! covers the canvas exactly. Resolutions with almost no common divisors
//! (prime or coprime sides) are rounded down to multiples of ten first.

use crate::io::configuration::{MIN_COMMON_FACTORS, RESOLUTION_ROUNDING};
use crate::io::error::{MosaicError, Result};
use tracing::debug;

/// Tile size and the output dimensions it was resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScale {
    /// Tile side length in output pixels
    pub factor: u32,
    /// Output width, possibly rounded down
    pub width: u32,
    /// Output height, possibly rounded down
    pub height: u32,
    /// Every common factor of `width` and `height` in `[2, min(width, height))`
    pub candidates: Vec<u32>,
}

impl ResolvedScale {
    /// Whether the target dimensions had to be rounded
    pub const fn was_rounded(&self, width: u32, height: u32) -> bool {
        self.width != width || self.height != height
    }

    /// Number of grid columns
    pub const fn columns(&self) -> u32 {
        self.width / self.factor
    }

    /// Number of grid rows
    pub const fn rows(&self) -> u32 {
        self.height / self.factor
    }
}

/// Integers `f` with `2 <= f < min(a, b)` dividing both `a` and `b`, ascending
pub fn common_factors(a: u32, b: u32) -> Vec<u32> {
    (2..a.min(b))
        .filter(|f| a % f == 0 && b % f == 0)
        .collect()
}

/// Round down to the nearest multiple of ten
pub const fn round_down(value: u32) -> u32 {
    value / RESOLUTION_ROUNDING * RESOLUTION_ROUNDING
}

/// Choose the tile size for `width` x `height` closest to `requested`
///
/// The smallest common factor at least `requested` wins; when none is that
/// large the largest common factor is used instead.
///
/// # Errors
///
/// Returns [`MosaicError::UnresolvableResolution`] if no common factor exists
/// even after rounding both dimensions down to multiples of ten.
pub fn resolve(requested: u32, width: u32, height: u32) -> Result<ResolvedScale> {
    let mut target = (width, height);
    let mut candidates = common_factors(width, height);

    if candidates.len() < MIN_COMMON_FACTORS {
        target = (round_down(width), round_down(height));
        candidates = common_factors(target.0, target.1);
        debug!(
            width = target.0,
            height = target.1,
            "rounded degenerate resolution"
        );
    }

    let factor = candidates
        .iter()
        .copied()
        .find(|&f| f >= requested)
        .or_else(|| candidates.last().copied())
        .ok_or(MosaicError::UnresolvableResolution { width, height })?;

    Ok(ResolvedScale {
        factor,
        width: target.0,
        height: target.1,
        candidates,
    })
}
