//! WASM bindings for seedcell-core.
//!
//! Exposes a stateful `VoronoiCanvas` that owns the points and the active
//! run, returning the presented surface as flat RGBA for `putImageData`.

use seedcell_core::{Generation, RunStatus, Session, SessionConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Interactive Voronoi canvas.
/// Drive animations by calling `tick` from `requestAnimationFrame`.
#[wasm_bindgen]
pub struct VoronoiCanvas {
    session: Session,
}

#[wasm_bindgen]
impl VoronoiCanvas {
    /// Create a canvas; without `seed`, point placement and colors are
    /// seeded from `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, seed: Option<u32>) -> Result<VoronoiCanvas, JsError> {
        let seed = match seed {
            Some(seed) => seed as u64,
            None => (js_sys::Math::random() * u32::MAX as f64) as u64,
        };
        let config = SessionConfig {
            width,
            height,
            ..SessionConfig::default()
        };
        let session = Session::new(config, seed)?;
        Ok(Self { session })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.dimensions().0
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.dimensions().1
    }

    /// Place a point at a click position. Returns false while animating
    /// or for a non-finite coordinate.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        self.session.add_point(x, y)
    }

    /// Replace the points with random ones; `count` defaults to 15 to 34.
    pub fn generate_random_points(&mut self, count: Option<u32>) -> bool {
        self.session.generate_random_points(count.map(|c| c as usize))
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn animated(&self) -> bool {
        self.session.animated_mode()
    }

    #[wasm_bindgen(setter)]
    pub fn set_animated(&mut self, animated: bool) {
        self.session.set_animated_mode(animated);
    }

    /// Pixels of radius growth per frame
    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.session.speed()
    }

    /// Clamped to 1..=100
    #[wasm_bindgen(setter)]
    pub fn set_speed(&mut self, speed: f64) {
        self.session.set_speed(speed);
    }

    /// Draw the diagram. Returns true when an animation started.
    pub fn generate(&mut self) -> Result<bool, JsError> {
        let generation = self.session.generate()?;
        Ok(generation == Generation::Started)
    }

    /// Advance one frame. Returns true while more frames remain.
    pub fn tick(&mut self) -> bool {
        self.session.tick() == Some(RunStatus::Running)
    }

    /// Stop the animation, keeping the last frame on screen.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_animating()
    }

    pub fn point_count(&self) -> usize {
        self.session.point_count()
    }

    /// Index of the point nearest to `(x, y)`, if any
    pub fn closest_seed(&self, x: f64, y: f64) -> Option<u32> {
        self.session.closest_seed(x, y).map(|i| i as u32)
    }

    /// Get point positions as flat [x0,y0, x1,y1, ...].
    pub fn positions(&self) -> Vec<f64> {
        self.session.seeds().iter()
            .flat_map(|s| [s.pos.x, s.pos.y])
            .collect()
    }

    /// Get point colors as flat [r0,g0,b0, r1,g1,b1, ...].
    pub fn colors(&self) -> Vec<u8> {
        self.session.seeds().iter()
            .flat_map(|s| s.rgb())
            .collect()
    }

    /// Presented surface as row-major RGBA (length = width*height*4)
    pub fn pixels(&self) -> Vec<u8> {
        self.session.surface().as_raw().clone()
    }
}
