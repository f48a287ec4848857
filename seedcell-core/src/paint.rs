//! Draw commands and a small software painter for the presented surface.

use image::RgbaImage;

use crate::{Position, Raster, Rgba, Segment};

/// One overlay drawing operation, painted in order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Disk of `radius` around `center`
    FillCircle {
        center: Position,
        radius: f64,
        color: Rgba,
    },
    /// Circle outline `width` wide, centered on `radius`
    StrokeCircle {
        center: Position,
        radius: f64,
        width: f64,
        color: Rgba,
    },
    /// A batch of line segments stroked as one path: overlapping segments
    /// blend once.
    StrokeSegments {
        segments: Vec<Segment>,
        width: f64,
        color: Rgba,
    },
}

/// Copy `raster` into an image and paint `commands` over it
pub fn compose(raster: &Raster, commands: &[DrawCommand]) -> RgbaImage {
    let mut image = raster.to_image();
    paint(&mut image, commands);
    image
}

/// Paint commands onto an image. Coverage is decided at pixel centers;
/// colors blend source-over by their alpha.
pub fn paint(image: &mut RgbaImage, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                let (center, radius) = (*center, *radius);
                let area = bounds(image, center, center, radius);
                cover(image, area, *color, |p| p.dist(&center) <= radius);
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                width,
                color,
            } => {
                let (center, radius) = (*center, *radius);
                let half = width / 2.0;
                let area = bounds(image, center, center, radius + half);
                cover(image, area, *color, |p| {
                    (p.dist(&center) - radius).abs() <= half
                });
            }
            DrawCommand::StrokeSegments {
                segments,
                width,
                color,
            } => stroke_segments(image, segments, *width, *color),
        }
    }
}

fn stroke_segments(image: &mut RgbaImage, segments: &[Segment], width: f64, color: Rgba) {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || segments.is_empty() {
        return;
    }
    let half = width / 2.0;

    let mut mask = vec![false; w as usize * h as usize];
    for segment in segments {
        let Some((x0, y0, x1, y1)) = bounds(image, segment.start, segment.end, half) else {
            continue;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = pixel_center(x, y);
                if dist_to_segment(p, segment) <= half {
                    mask[y as usize * w as usize + x as usize] = true;
                }
            }
        }
    }

    for (i, covered) in mask.iter().enumerate() {
        if *covered {
            let x = (i % w as usize) as u32;
            let y = (i / w as usize) as u32;
            blend(image.get_pixel_mut(x, y), color);
        }
    }
}

/// Blend `color` into every pixel of `area` whose center passes `inside`
fn cover<F>(image: &mut RgbaImage, area: Option<(u32, u32, u32, u32)>, color: Rgba, inside: F)
where
    F: Fn(Position) -> bool,
{
    let Some((x0, y0, x1, y1)) = area else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if inside(pixel_center(x, y)) {
                blend(image.get_pixel_mut(x, y), color);
            }
        }
    }
}

/// Inclusive pixel range covering the box spanned by `a` and `b`, grown by
/// `pad`, clipped to the image. `None` when nothing is left.
fn bounds(image: &RgbaImage, a: Position, b: Position, pad: f64) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let min_x = (a.x.min(b.x) - pad).floor();
    let max_x = (a.x.max(b.x) + pad).ceil();
    let min_y = (a.y.min(b.y) - pad).floor();
    let max_y = (a.y.max(b.y) + pad).ceil();
    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_x < 0.0 || max_y < 0.0 || min_x >= w as f64 || min_y >= h as f64 {
        return None;
    }
    Some((
        min_x.max(0.0) as u32,
        min_y.max(0.0) as u32,
        (max_x as u32).min(w - 1),
        (max_y as u32).min(h - 1),
    ))
}

fn pixel_center(x: u32, y: u32) -> Position {
    Position::new(x as f64 + 0.5, y as f64 + 0.5)
}

fn dist_to_segment(p: Position, segment: &Segment) -> f64 {
    let (a, b) = (segment.start, segment.end);
    let len_sq = a.dist_sq(&b);
    if len_sq == 0.0 {
        return p.dist(&a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    p.dist(&Position::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)))
}

/// Source-over blend of `color` onto `dst`
fn blend(dst: &mut image::Rgba<u8>, color: Rgba) {
    let alpha = color[3] as f64 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for c in 0..3 {
        let mixed = color[c] as f64 * alpha + dst.0[c] as f64 * inv;
        dst.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let out_alpha = color[3] as f64 + dst.0[3] as f64 * inv;
    dst.0[3] = out_alpha.round().clamp(0.0, 255.0) as u8;
}
