//! Caller-owned drawing session: the point list, the generation mode and
//! the run currently animating, plus the surface presented to the user.

use image::RgbaImage;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::seed::random_count;
use crate::{
    closest_seed, compose, fill_instant, paint, AnimationSpeed, GenerationRun, Overlay,
    OverlayStyle, Position, Raster, RasterError, Result, Rgb, RunStatus, Seed, SeedSet,
};

/// Light grey the surface is cleared to
pub const DEFAULT_BACKGROUND: Rgb = [0xf8, 0xf9, 0xfa];

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    /// Grow regions frame by frame instead of filling in one pass
    pub animated: bool,
    pub speed: AnimationSpeed,
    pub overlay: OverlayStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: DEFAULT_BACKGROUND,
            animated: false,
            speed: AnimationSpeed::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

/// What [`Session::generate`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// The diagram was drawn in one pass
    Finished,
    /// An animated run started; drive it with [`Session::tick`]
    Started,
}

pub struct Session {
    config: SessionConfig,
    seeds: SeedSet,
    rng: ChaCha8Rng,
    overlay: Overlay,
    active: Option<GenerationRun>,
    surface: RgbaImage,
}

impl Session {
    /// `rng_seed` keys point placement and colors, making a session reproducible.
    pub fn new(config: SessionConfig, rng_seed: u64) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(RasterError::InvalidDimension {
                width: config.width,
                height: config.height,
            });
        }
        let surface = blank(&config);
        Ok(Self {
            overlay: Overlay::new(config.overlay),
            config,
            seeds: SeedSet::default(),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            active: None,
            surface,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn seeds(&self) -> &[Seed] {
        self.seeds.as_slice()
    }

    pub fn point_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn animated_mode(&self) -> bool {
        self.config.animated
    }

    pub fn set_animated_mode(&mut self, animated: bool) {
        self.config.animated = animated;
    }

    pub fn speed(&self) -> f64 {
        self.config.speed.get()
    }

    /// Set the radius advance per frame, clamped to 1..=100
    pub fn set_speed(&mut self, pixels_per_frame: f64) {
        self.config.speed = AnimationSpeed::clamped(pixels_per_frame);
    }

    /// Share of pixels the active run has resolved so far
    pub fn resolved_fraction(&self) -> Option<f64> {
        self.active.as_ref().map(|run| run.resolved().fraction())
    }

    /// The image currently presented
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Index of the point nearest to `(x, y)`
    pub fn closest_seed(&self, x: f64, y: f64) -> Option<usize> {
        closest_seed(x, y, self.seeds.as_slice())
    }

    /// Place a point with a random color. Ignored while a run is animating
    /// or when a coordinate is not finite.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        if self.is_animating() || !(x.is_finite() && y.is_finite()) {
            return false;
        }
        let seed = Seed::with_random_color(Position::new(x, y), &mut self.rng);
        self.seeds.push(seed);
        self.redraw();
        true
    }

    /// Replace the points with `count` random ones, or 15 to 34 when `None`.
    /// Ignored while a run is animating.
    pub fn generate_random_points(&mut self, count: Option<usize>) -> bool {
        if self.is_animating() {
            return false;
        }
        let count = count.unwrap_or_else(|| random_count(&mut self.rng));
        self.seeds = SeedSet::random_with(
            &mut self.rng,
            count,
            self.config.width as f64,
            self.config.height as f64,
        );
        self.redraw();
        true
    }

    /// Drop every point, stopping any animation, and clear the surface
    pub fn clear(&mut self) {
        self.cancel();
        self.seeds.clear();
        self.surface = blank(&self.config);
    }

    /// Draw the diagram for the current points.
    pub fn generate(&mut self) -> Result<Generation> {
        if self.seeds.is_empty() {
            return Err(RasterError::NoSeeds);
        }
        if self.is_animating() {
            return Err(RasterError::RunInProgress);
        }

        let (width, height) = self.dimensions();
        let mut raster = Raster::filled(width, height, self.config.background);

        if self.config.animated {
            self.overlay.reset();
            self.surface = raster.to_image();
            self.active = Some(GenerationRun::new(
                raster,
                self.seeds.as_slice(),
                self.config.speed,
            ));
            return Ok(Generation::Started);
        }

        fill_instant(&mut raster, self.seeds.as_slice());
        let commands = self.overlay.finished(width, height, self.seeds.as_slice());
        self.surface = compose(&raster, &commands);
        Ok(Generation::Finished)
    }

    /// Advance the active run by one frame and repaint the surface.
    /// `None` when nothing is animating.
    pub fn tick(&mut self) -> Option<RunStatus> {
        let run = self.active.as_mut()?;
        let status = run.step();

        match status {
            RunStatus::Running => {
                let commands = self.overlay.frame(run);
                self.surface = compose(run.raster(), &commands);
            }
            RunStatus::Complete => {
                let raster = run.raster();
                let commands = self.overlay.finished(raster.width(), raster.height(), run.seeds());
                self.surface = compose(raster, &commands);
                self.active = None;
            }
            RunStatus::Cancelled => {
                self.active = None;
            }
        }
        Some(status)
    }

    /// Stop the active run, keeping the last presented frame.
    /// Returns false when nothing was animating.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(run) => {
                run.cancel_handle().cancel();
                true
            }
            None => false,
        }
    }

    /// Background with the point markers on top
    fn redraw(&mut self) {
        let mut surface = blank(&self.config);
        paint(&mut surface, &self.overlay.markers(self.seeds.as_slice()));
        self.surface = surface;
    }
}

fn blank(config: &SessionConfig) -> RgbaImage {
    let [r, g, b] = config.background;
    RgbaImage::from_pixel(config.width, config.height, image::Rgba([r, g, b, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(width: u32, height: u32) -> Session {
        let config = SessionConfig {
            width,
            height,
            ..SessionConfig::default()
        };
        Session::new(config, 42).unwrap()
    }

    #[test]
    fn test_rejects_empty_surface() {
        let config = SessionConfig {
            width: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config, 0),
            Err(RasterError::InvalidDimension { width: 0, height: 600 })
        ));
    }

    #[test]
    fn test_generate_needs_points() {
        let mut s = session(40, 30);
        assert!(matches!(s.generate(), Err(RasterError::NoSeeds)));
    }

    #[test]
    fn test_add_point_draws_marker() {
        let mut s = session(40, 30);
        assert!(s.add_point(20.0, 15.0));
        assert_eq!(s.point_count(), 1);

        let [r, g, b] = s.seeds()[0].rgb();
        assert_eq!(s.surface().get_pixel(20, 15).0, [r, g, b, 255]);
        let [br, bg, bb] = DEFAULT_BACKGROUND;
        assert_eq!(s.surface().get_pixel(0, 0).0, [br, bg, bb, 255]);
    }

    #[test]
    fn test_add_point_rejects_non_finite() {
        let mut s = session(40, 30);
        assert!(!s.add_point(f64::NAN, 3.0));
        assert!(!s.add_point(3.0, f64::INFINITY));
        assert!(!s.add_point(f64::NEG_INFINITY, f64::NAN));
        assert_eq!(s.point_count(), 0);
        assert!(matches!(s.generate(), Err(RasterError::NoSeeds)));

        // Far but finite points are kept
        assert!(s.add_point(1e9, 0.0));
        assert_eq!(s.point_count(), 1);
    }

    #[test]
    fn test_instant_generation() {
        let mut s = session(80, 40);
        s.add_point(10.0, 10.0);
        s.add_point(70.0, 10.0);
        assert_eq!(s.generate().unwrap(), Generation::Finished);
        assert!(!s.is_animating());

        // Far from markers and from the boundary near x = 40
        let [r, g, b] = s.seeds()[0].rgb();
        assert_eq!(s.surface().get_pixel(2, 35).0, [r, g, b, 255]);
        let [r, g, b] = s.seeds()[1].rgb();
        assert_eq!(s.surface().get_pixel(77, 35).0, [r, g, b, 255]);
    }

    #[test]
    fn test_animated_generation_ends_like_instant() {
        let mut s = session(60, 45);
        s.generate_random_points(Some(8));
        s.set_animated_mode(true);
        s.set_speed(6.0);

        assert_eq!(s.generate().unwrap(), Generation::Started);
        assert!(s.is_animating());
        assert!(!s.add_point(1.0, 1.0));
        assert!(!s.generate_random_points(None));
        assert!(matches!(s.generate(), Err(RasterError::RunInProgress)));

        let mut frames = 0;
        while let Some(status) = s.tick() {
            frames += 1;
            if status != RunStatus::Running {
                assert_eq!(status, RunStatus::Complete);
            }
        }
        // diagonal 75 at 6px per frame
        assert_eq!(frames, 13);
        assert!(!s.is_animating());
        assert_eq!(s.point_count(), 8);
        let animated = s.surface().clone();

        s.set_animated_mode(false);
        s.generate().unwrap();
        assert_eq!(s.surface(), &animated);
    }

    #[test]
    fn test_cancel_keeps_last_frame() {
        let mut s = session(200, 200);
        s.add_point(100.0, 100.0);
        s.set_animated_mode(true);
        s.generate().unwrap();

        assert_eq!(s.resolved_fraction(), Some(0.0));
        assert_eq!(s.tick(), Some(RunStatus::Running));
        let fraction = s.resolved_fraction().unwrap();
        assert!(fraction > 0.0 && fraction < 0.1);
        let frame = s.surface().clone();
        assert!(s.cancel());
        assert!(!s.cancel());
        assert!(!s.is_animating());
        assert_eq!(s.tick(), None);
        assert_eq!(s.surface(), &frame);
    }

    #[test]
    fn test_clear_stops_animation() {
        let mut s = session(50, 50);
        s.generate_random_points(Some(3));
        s.set_animated_mode(true);
        s.generate().unwrap();
        s.tick();

        s.clear();
        assert!(!s.is_animating());
        assert_eq!(s.point_count(), 0);
        let [r, g, b] = DEFAULT_BACKGROUND;
        assert!(s.surface().pixels().all(|p| p.0 == [r, g, b, 255]));
    }

    #[test]
    fn test_random_points_default_count() {
        let mut s = session(100, 100);
        assert!(s.generate_random_points(None));
        assert!((15..35).contains(&s.point_count()));
        assert!(s.generate_random_points(Some(4)));
        assert_eq!(s.point_count(), 4);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut s = session(10, 10);
        assert_eq!(s.speed(), 15.0);
        s.set_speed(0.0);
        assert_eq!(s.speed(), 1.0);
        s.set_speed(1000.0);
        assert_eq!(s.speed(), 100.0);
    }

    #[test]
    fn test_sessions_with_same_seed_match() {
        let mut a = session(64, 64);
        let mut b = session(64, 64);
        a.generate_random_points(None);
        b.generate_random_points(None);
        assert_eq!(a.seeds(), b.seeds());
        a.generate().unwrap();
        b.generate().unwrap();
        assert_eq!(a.surface(), b.surface());
    }
}
