//! Approximate region boundaries from a coarse sample grid.
//!
//! Samples sit every `step` pixels. Each sample is compared with its right
//! and bottom neighbours only; a differing owner emits the grid edge between
//! them. The result is a stair-stepped outline at the sample resolution.

use crate::{Position, ResolvedSet};

/// Straight stroke between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Position,
    pub end: Position,
}

impl Segment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            start: Position::new(x0, y0),
            end: Position::new(x1, y1),
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
}

/// Boundaries over the whole raster.
///
/// `closest` maps a pixel to its owning seed; it is queried once per
/// lattice point.
pub fn trace_full<F>(width: u32, height: u32, closest: F, step: u32) -> Vec<Segment>
where
    F: Fn(u32, u32) -> Option<usize>,
{
    let lattice = Lattice::new(width, height, step);
    let owners = lattice.sample(|x, y| Some(closest(x, y)));
    lattice.scan(&owners)
}

/// Boundaries restricted to resolved pixels: a pair of samples is only
/// compared when both are in `resolved`.
pub fn trace_partial<F>(
    width: u32,
    height: u32,
    resolved: &ResolvedSet,
    closest: F,
    step: u32,
) -> Vec<Segment>
where
    F: Fn(u32, u32) -> Option<usize>,
{
    let lattice = Lattice::new(width, height, step);
    let owners = lattice.sample(|x, y| resolved.contains(x, y).then(|| closest(x, y)));
    lattice.scan(&owners)
}

/// Sample points `(col * step, row * step)` inside the raster
struct Lattice {
    step: u32,
    cols: usize,
    rows: usize,
}

impl Lattice {
    fn new(width: u32, height: u32, step: u32) -> Self {
        let step = step.max(1);
        Self {
            step,
            cols: width.div_ceil(step) as usize,
            rows: height.div_ceil(step) as usize,
        }
    }

    /// Owner at every lattice point; the outer `None` marks a point to skip.
    fn sample<S>(&self, owner_at: S) -> Vec<Option<Option<usize>>>
    where
        S: Fn(u32, u32) -> Option<Option<usize>>,
    {
        let mut owners = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                owners.push(owner_at(col as u32 * self.step, row as u32 * self.step));
            }
        }
        owners
    }

    fn scan(&self, owners: &[Option<Option<usize>>]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let step = self.step as f64;

        // The last row and column only serve as neighbours
        for row in 0..self.rows.saturating_sub(1) {
            for col in 0..self.cols.saturating_sub(1) {
                let Some(current) = owners[row * self.cols + col] else {
                    continue;
                };
                let x = col as f64 * step;
                let y = row as f64 * step;

                if let Some(right) = owners[row * self.cols + col + 1] {
                    if right != current {
                        segments.push(Segment::new(x + step, y, x + step, y + step));
                    }
                }

                if let Some(bottom) = owners[(row + 1) * self.cols + col] {
                    if bottom != current {
                        segments.push(Segment::new(x, y + step, x + step, y + step));
                    }
                }
            }
        }

        segments
    }
}
