//! Seed and position types for nearest-seed rasterization.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::color::{random_color, ColorToken};
use crate::Rgb;

/// Smallest point count picked by [`random_count`]
pub const RANDOM_COUNT_MIN: usize = 15;
/// Width of the range [`random_count`] draws from
pub const RANDOM_COUNT_SPAN: usize = 20;

/// 2D position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position
    pub fn dist_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another position
    pub fn dist(&self, other: &Position) -> f64 {
        self.dist_sq(other).sqrt()
    }
}

/// A seed point with the color its region is painted in
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub pos: Position,
    pub color: ColorToken,
}

impl Seed {
    pub fn new(pos: Position, color: ColorToken) -> Self {
        Self { pos, color }
    }

    /// Place a seed with a random color drawn from `rng`
    pub fn with_random_color<R: Rng + ?Sized>(pos: Position, rng: &mut R) -> Self {
        Self {
            pos,
            color: random_color(rng),
        }
    }

    pub fn rgb(&self) -> Rgb {
        self.color.to_rgb()
    }
}

/// Default number of points for a random scene: 15 plus up to 19 more.
pub fn random_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    RANDOM_COUNT_MIN + rng.gen_range(0..RANDOM_COUNT_SPAN)
}

/// Ordered seed sequence. A seed's index is its identity for the
/// nearest-seed comparisons of a generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSet {
    pub seeds: Vec<Seed>,
}

impl SeedSet {
    pub fn new(seeds: Vec<Seed>) -> Self {
        Self { seeds }
    }

    /// Reproducible random scene: `count` seeds spread uniformly over the
    /// `width` x `height` surface, positions and colors drawn from a
    /// ChaCha stream keyed by `seed`.
    pub fn random(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::random_with(&mut rng, count, width, height)
    }

    pub fn random_with<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        width: f64,
        height: f64,
    ) -> Self {
        let seeds = (0..count)
            .map(|_| {
                let pos = Position::new(
                    rng.gen::<f64>() * width,
                    rng.gen::<f64>() * height,
                );
                Seed::with_random_color(pos, &mut *rng)
            })
            .collect();
        Self::new(seeds)
    }

    pub fn push(&mut self, seed: Seed) {
        self.seeds.push(seed);
    }

    pub fn clear(&mut self) {
        self.seeds.clear();
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn as_slice(&self) -> &[Seed] {
        &self.seeds
    }
}

impl From<Vec<Seed>> for SeedSet {
    fn from(seeds: Vec<Seed>) -> Self {
        Self::new(seeds)
    }
}
