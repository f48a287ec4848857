//! Core Voronoi rasterization library.
//!
//! Colors every pixel of a raster after its nearest seed, either in one
//! pass or as an animation whose search radius grows each frame, and
//! traces the boundaries between neighbouring regions. Rows are resolved
//! in parallel with Rayon when the `parallel` feature is enabled.

mod boundary;
mod color;
mod engine;
mod markers;
mod nearest;
mod overlay;
mod paint;
mod raster;
mod seed;
mod session;

pub use boundary::{trace_full, trace_partial, Segment};
pub use color::{random_color, rgb_from_css, ColorToken, SEED_LIGHTNESS, SEED_SATURATION};
pub use engine::{
    fill_animated, fill_instant, Animation, AnimationSpeed, CancelHandle, GenerationRun,
    RunStatus,
};
pub use markers::{draw_markers, MarkerStyle};
pub use nearest::{closest_seed, nearest_seed};
pub use overlay::{BoundaryStyle, Overlay, OverlayStyle};
pub use paint::{compose, paint, DrawCommand};
pub use raster::{Raster, ResolvedSet, UNSET};
pub use seed::{random_count, Position, Seed, SeedSet};
pub use session::{Generation, Session, SessionConfig, DEFAULT_BACKGROUND};

/// RGB color tuple
pub type Rgb = [u8; 3];

/// RGBA color tuple
pub type Rgba = [u8; 4];

/// Error type for rasterization and session operations
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No seeds provided")]
    NoSeeds,

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Invalid animation speed: {0} (must be positive and finite)")]
    InvalidSpeed(f64),

    #[error("Unparseable color: {0}")]
    UnparseableColor(String),

    #[error("A generation run is already in progress")]
    RunInProgress,
}

pub type Result<T> = std::result::Result<T, RasterError>;
