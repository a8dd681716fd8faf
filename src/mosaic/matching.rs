//! Tile selection for a grid cell's average colour

use crate::io::configuration::{
    BLACK, DEFAULT_BLACK_SUBSTITUTE, DEFAULT_SEED, DEFAULT_WHITE_SUBSTITUTE, NEAR_WHITE_THRESHOLD,
    WHITE,
};
use crate::mosaic::color::AverageColor;
use crate::mosaic::tiles::{Tile, TileLibrary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How a cell colour is turned into a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Closest tile by squared RGB distance, earliest tile on ties
    #[default]
    Nearest,
    /// Near-white cells get the last tile, every other cell a random earlier tile
    Randomized,
    /// Pure white and pure black cells are matched as their substitutes
    ColorSwap {
        /// Colour matched in place of pure white
        white: AverageColor,
        /// Colour matched in place of pure black
        black: AverageColor,
    },
}

impl MatchStrategy {
    /// Colour swap with the default substitutes
    pub const fn default_color_swap() -> Self {
        Self::ColorSwap {
            white: AverageColor::from_array(DEFAULT_WHITE_SUBSTITUTE),
            black: AverageColor::from_array(DEFAULT_BLACK_SUBSTITUTE),
        }
    }
}

/// Index of the closest tile, first one winning ties
///
/// Brute-force scan over the whole library; returns `None` only when the
/// library is empty.
pub fn nearest_index(library: &TileLibrary, color: AverageColor) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, tile) in library.tiles().iter().enumerate() {
        let distance = color.squared_distance(tile.average());
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Closest tile to `color`, first one winning ties
pub fn nearest(library: &TileLibrary, color: AverageColor) -> Option<&Tile> {
    nearest_index(library, color).and_then(|index| library.get(index))
}

/// Applies a [`MatchStrategy`] against a library
///
/// Owns the random source so randomized matching is reproducible per seed.
#[derive(Debug, Clone)]
pub struct Matcher {
    strategy: MatchStrategy,
    rng: StdRng,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchStrategy::default(), DEFAULT_SEED)
    }
}

impl Matcher {
    /// Create a matcher for `strategy`, seeding its random source
    pub fn new(strategy: MatchStrategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Strategy in use
    pub const fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Pick a tile for a cell, `None` only for an empty library
    pub fn select<'a>(&mut self, library: &'a TileLibrary, color: AverageColor) -> Option<&'a Tile> {
        match self.strategy {
            MatchStrategy::Nearest => nearest(library, color),
            MatchStrategy::Randomized => self.random(library, color),
            MatchStrategy::ColorSwap { white, black } => {
                let query = if color == AverageColor::from_array(WHITE) {
                    white
                } else if color == AverageColor::from_array(BLACK) {
                    black
                } else {
                    color
                };
                nearest(library, query)
            }
        }
    }

    fn random<'a>(&mut self, library: &'a TileLibrary, color: AverageColor) -> Option<&'a Tile> {
        let candidates = library.len().saturating_sub(1);
        if color.is_at_least(NEAR_WHITE_THRESHOLD) || candidates == 0 {
            return library.last();
        }
        library.get(self.rng.random_range(0..candidates))
    }
}
