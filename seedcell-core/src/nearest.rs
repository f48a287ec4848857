//! Brute-force nearest-seed lookup.

use crate::{Position, Seed};

/// Index of the seed closest to `(x, y)`, or `None` when there are no seeds.
///
/// Ties go to the lowest index.
#[inline]
pub fn closest_seed(x: f64, y: f64, seeds: &[Seed]) -> Option<usize> {
    nearest_seed(x, y, seeds).map(|(index, _)| index)
}

/// Like [`closest_seed`], also returning the Euclidean distance to that seed.
pub fn nearest_seed(x: f64, y: f64, seeds: &[Seed]) -> Option<(usize, f64)> {
    let point = Position::new(x, y);
    let mut min_dist = f64::INFINITY;
    let mut nearest = None;

    for (i, seed) in seeds.iter().enumerate() {
        let dist = point.dist(&seed.pos);
        // Strict comparison keeps the earliest seed on equal distances
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(i);
        }
    }

    nearest.map(|i| (i, min_dist))
}
