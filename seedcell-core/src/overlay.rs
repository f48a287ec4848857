//! Per-frame overlay: boundary strokes under seed markers.

use crate::markers::draw_markers_styled;
use crate::{
    closest_seed, trace_full, trace_partial, DrawCommand, GenerationRun, MarkerStyle, Rgba,
    Seed, Segment,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryStyle {
    /// Sample spacing in pixels
    pub step: u32,
    pub width: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Boundaries of a finished diagram
    pub full: BoundaryStyle,
    /// Boundaries drawn while a run is animating
    pub partial: BoundaryStyle,
    /// Re-trace partial boundaries every this many frames
    pub partial_every: u32,
    pub markers: MarkerStyle,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            full: BoundaryStyle {
                step: 2,
                width: 2.0,
                color: [255, 255, 255, 128],
            },
            partial: BoundaryStyle {
                step: 4,
                width: 1.0,
                color: [255, 255, 255, 77],
            },
            partial_every: 3,
            markers: MarkerStyle::default(),
        }
    }
}

/// Builds the draw commands laid over the raster.
///
/// Partial boundaries are expensive, so they are traced only every
/// `partial_every` frames; frames in between re-issue the last trace.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    style: OverlayStyle,
    partial: Vec<Segment>,
}

impl Overlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            partial: Vec::new(),
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Forget the cached partial trace (start of a new run)
    pub fn reset(&mut self) {
        self.partial.clear();
    }

    /// Overlay for an animation frame: partial boundaries, then markers
    pub fn frame(&mut self, run: &GenerationRun) -> Vec<DrawCommand> {
        if run.frame_count() % self.style.partial_every.max(1) == 0 {
            let resolved = run.resolved();
            self.partial = trace_partial(
                resolved.width(),
                resolved.height(),
                resolved,
                |x, y| resolved.owner(x, y),
                self.style.partial.step,
            );
        }

        let mut commands = Vec::new();
        if !self.partial.is_empty() {
            commands.push(stroke(self.partial.clone(), &self.style.partial));
        }
        commands.extend(draw_markers_styled(run.seeds(), &self.style.markers));
        commands
    }

    /// Overlay for a finished diagram: full boundaries, then markers
    pub fn finished(&self, width: u32, height: u32, seeds: &[Seed]) -> Vec<DrawCommand> {
        let segments = trace_full(
            width,
            height,
            |x, y| closest_seed(x as f64, y as f64, seeds),
            self.style.full.step,
        );

        let mut commands = Vec::new();
        if !segments.is_empty() {
            commands.push(stroke(segments, &self.style.full));
        }
        commands.extend(draw_markers_styled(seeds, &self.style.markers));
        commands
    }

    /// Markers alone, for an idle surface
    pub fn markers(&self, seeds: &[Seed]) -> Vec<DrawCommand> {
        draw_markers_styled(seeds, &self.style.markers)
    }
}

fn stroke(segments: Vec<Segment>, style: &BoundaryStyle) -> DrawCommand {
    DrawCommand::StrokeSegments {
        segments,
        width: style.width,
        color: style.color,
    }
}
