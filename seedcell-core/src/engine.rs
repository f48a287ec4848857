//! Nearest-seed raster fills, instant and animated.
//!
//! Both modes share one resolution pass: every unresolved pixel whose
//! nearest seed lies within a radius takes that seed's color. Instant
//! mode runs it once with an infinite radius; animated mode runs it once
//! per frame while the radius grows, skipping pixels already resolved.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{nearest_seed, Raster, RasterError, ResolvedSet, Result, Rgb, Seed};

/// Search-radius advance per frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpeed(f64);

impl AnimationSpeed {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 100.0;
    pub const DEFAULT: f64 = 15.0;

    /// Reject speeds that would never finish a run
    pub fn new(pixels_per_frame: f64) -> Result<Self> {
        if pixels_per_frame.is_finite() && pixels_per_frame > 0.0 {
            Ok(Self(pixels_per_frame))
        } else {
            Err(RasterError::InvalidSpeed(pixels_per_frame))
        }
    }

    /// Clamp into `MIN..=MAX`; non-finite input gives the default.
    pub fn clamped(pixels_per_frame: f64) -> Self {
        if pixels_per_frame.is_finite() {
            Self(pixels_per_frame.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::DEFAULT)
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Shared cancellation flag for a generation run. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the run at its next frame boundary. Calling it again does nothing.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Color every pixel after its nearest seed, alpha 255.
///
/// Leaves the raster untouched when it is empty or there are no seeds.
pub fn fill_instant(raster: &mut Raster, seeds: &[Seed]) {
    let mut resolved = ResolvedSet::new(raster.width(), raster.height());
    let palette = palette(seeds);
    resolve_within(raster, &mut resolved, seeds, &palette, f64::INFINITY);
}

fn palette(seeds: &[Seed]) -> Vec<Rgb> {
    seeds.iter().map(Seed::rgb).collect()
}

/// Resolve every unresolved pixel whose nearest seed is at most `radius`
/// away. Returns the number of pixels newly resolved.
fn resolve_within(
    raster: &mut Raster,
    resolved: &mut ResolvedSet,
    seeds: &[Seed],
    palette: &[Rgb],
    radius: f64,
) -> usize {
    if raster.is_empty() || seeds.is_empty() {
        return 0;
    }
    let width = raster.width() as usize;

    let resolve_row = |y: usize, row: &mut [u8], owners: &mut [i32]| -> usize {
        let py = y as f64;
        let mut newly = 0;
        for (x, (px, owner)) in row.chunks_exact_mut(4).zip(owners.iter_mut()).enumerate() {
            if *owner >= 0 {
                continue;
            }
            let Some((nearest, dist)) = nearest_seed(x as f64, py, seeds) else {
                continue;
            };
            if dist <= radius {
                let [r, g, b] = palette[nearest];
                px.copy_from_slice(&[r, g, b, 255]);
                *owner = nearest as i32;
                newly += 1;
            }
        }
        newly
    };

    #[cfg(feature = "parallel")]
    let newly: usize = raster
        .pixels
        .par_chunks_mut(width * 4)
        .zip(resolved.owner_of.par_chunks_mut(width))
        .enumerate()
        .map(|(y, (row, owners))| resolve_row(y, row, owners))
        .sum();

    #[cfg(not(feature = "parallel"))]
    let newly: usize = raster
        .pixels
        .chunks_mut(width * 4)
        .zip(resolved.owner_of.chunks_mut(width))
        .enumerate()
        .map(|(y, (row, owners))| resolve_row(y, row, owners))
        .sum();

    resolved.count += newly;
    newly
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Complete,
    Cancelled,
}

/// State of one animated generation: the raster and resolved set it owns,
/// a snapshot of the seeds, and the current search radius.
#[derive(Debug)]
pub struct GenerationRun {
    raster: Raster,
    resolved: ResolvedSet,
    seeds: Vec<Seed>,
    palette: Vec<Rgb>,
    speed: AnimationSpeed,
    radius: f64,
    max_radius: f64,
    frame_count: u32,
    status: RunStatus,
    cancel: CancelHandle,
}

impl GenerationRun {
    pub fn new(raster: Raster, seeds: &[Seed], speed: AnimationSpeed) -> Self {
        let resolved = ResolvedSet::new(raster.width(), raster.height());
        let max_radius = raster.diagonal();
        Self {
            raster,
            resolved,
            seeds: seeds.to_vec(),
            palette: palette(seeds),
            speed,
            radius: 0.0,
            max_radius,
            frame_count: 0,
            status: RunStatus::Running,
            cancel: CancelHandle::new(),
        }
    }

    /// Advance one frame: grow the radius by the speed and resolve every
    /// pending pixel now within reach.
    ///
    /// Once the run is complete or cancelled this returns that status
    /// without touching the raster.
    pub fn step(&mut self) -> RunStatus {
        if self.status == RunStatus::Running && self.cancel.is_cancelled() {
            self.status = RunStatus::Cancelled;
        }
        if self.status != RunStatus::Running {
            return self.status;
        }

        self.radius += self.speed.get();
        self.frame_count += 1;
        resolve_within(
            &mut self.raster,
            &mut self.resolved,
            &self.seeds,
            &self.palette,
            self.radius,
        );

        if self.seeds.is_empty() || self.radius >= self.max_radius {
            // Seeds off the raster can leave far pixels pending at the diagonal
            resolve_within(
                &mut self.raster,
                &mut self.resolved,
                &self.seeds,
                &self.palette,
                f64::INFINITY,
            );
            self.status = RunStatus::Complete;
        }
        self.status
    }

    /// Step until the run completes or is cancelled
    pub fn run_to_end(&mut self) -> RunStatus {
        loop {
            let status = self.step();
            if status != RunStatus::Running {
                return status;
            }
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn resolved(&self) -> &ResolvedSet {
        &self.resolved
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status != RunStatus::Running
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Release the raster, ending the run
    pub fn into_raster(self) -> Raster {
        self.raster
    }

    fn mark_cancelled(&mut self) {
        self.status = RunStatus::Cancelled;
    }
}

/// Callback-driven wrapper around a [`GenerationRun`].
///
/// The host calls [`Animation::tick`] once per repaint. `on_frame` runs
/// after each frame's raster update; `on_complete` runs once, on the frame
/// that resolves the run. Neither runs again after the run is cancelled.
pub struct Animation<F, C>
where
    F: FnMut(&GenerationRun),
    C: FnOnce(&GenerationRun),
{
    run: GenerationRun,
    on_frame: F,
    on_complete: Option<C>,
}

/// Start an animated fill of `raster`. No frame is computed until the
/// first [`Animation::tick`].
pub fn fill_animated<F, C>(
    raster: Raster,
    seeds: &[Seed],
    speed: AnimationSpeed,
    on_frame: F,
    on_complete: C,
) -> Animation<F, C>
where
    F: FnMut(&GenerationRun),
    C: FnOnce(&GenerationRun),
{
    Animation {
        run: GenerationRun::new(raster, seeds, speed),
        on_frame,
        on_complete: Some(on_complete),
    }
}

impl<F, C> Animation<F, C>
where
    F: FnMut(&GenerationRun),
    C: FnOnce(&GenerationRun),
{
    /// Run one scheduled frame
    pub fn tick(&mut self) -> RunStatus {
        if self.run.is_finished() {
            return self.run.status();
        }

        let status = self.run.step();
        if status == RunStatus::Cancelled {
            return status;
        }

        (self.on_frame)(&self.run);

        // Cancelled from inside on_frame: keep this frame's write, skip completion
        if self.run.cancel.is_cancelled() {
            self.run.mark_cancelled();
            return RunStatus::Cancelled;
        }

        if status == RunStatus::Complete {
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(&self.run);
            }
        }
        status
    }

    /// Tick until the run completes or is cancelled
    pub fn run_to_end(&mut self) -> RunStatus {
        loop {
            let status = self.tick();
            if status != RunStatus::Running {
                return status;
            }
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.run.cancel_handle()
    }

    pub fn cancel(&self) {
        self.run.cancel.cancel();
    }

    pub fn run(&self) -> &GenerationRun {
        &self.run
    }

    pub fn into_run(self) -> GenerationRun {
        self.run
    }
}
