//! Seed markers drawn above the raster and boundaries.

use crate::{DrawCommand, Rgba, Seed};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub outline_width: f64,
    pub outline_color: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 6.0,
            outline_width: 2.0,
            outline_color: [255, 255, 255, 255],
        }
    }
}

/// A filled disk in the seed's color with a white outline, per seed.
///
/// Issue these last so markers stay visible.
pub fn draw_markers(seeds: &[Seed]) -> Vec<DrawCommand> {
    draw_markers_styled(seeds, &MarkerStyle::default())
}

pub(crate) fn draw_markers_styled(seeds: &[Seed], style: &MarkerStyle) -> Vec<DrawCommand> {
    seeds
        .iter()
        .flat_map(|seed| {
            let [r, g, b] = seed.rgb();
            [
                DrawCommand::FillCircle {
                    center: seed.pos,
                    radius: style.radius,
                    color: [r, g, b, 255],
                },
                DrawCommand::StrokeCircle {
                    center: seed.pos,
                    radius: style.radius,
                    width: style.outline_width,
                    color: style.outline_color,
                },
            ]
        })
        .collect()
}
