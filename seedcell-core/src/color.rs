//! Seed colors: random hue generation and HSL to RGB conversion.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::{RasterError, Rgb};

/// Saturation given to every random seed color
pub const SEED_SATURATION: f64 = 0.70;
/// Lightness given to every random seed color
pub const SEED_LIGHTNESS: f64 = 0.60;

/// A color in hue/saturation/lightness form.
///
/// `hue` is in degrees within `[0, 360)`, `saturation` and `lightness`
/// are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorToken {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl ColorToken {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: saturation.clamp(0.0, 1.0),
            lightness: lightness.clamp(0.0, 1.0),
        }
    }

    /// Seed color with the fixed saturation and lightness
    pub fn from_hue(hue: f64) -> Self {
        Self::new(hue, SEED_SATURATION, SEED_LIGHTNESS)
    }

    /// Exact HSL to RGB conversion, each channel rounded to the nearest integer.
    pub fn to_rgb(&self) -> Rgb {
        let h = self.hue / 360.0;
        let s = self.saturation;
        let l = self.lightness;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        [to_byte(r), to_byte(g), to_byte(b)]
    }
}

/// Random seed color: hue uniform in `[0, 360)`, saturation 70%, lightness 60%.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> ColorToken {
    ColorToken::from_hue(rng.gen_range(0.0..360.0))
}

/// Convert a textual `hsl(...)` color, falling back to black when it
/// cannot be parsed.
pub fn rgb_from_css(text: &str) -> Rgb {
    text.parse::<ColorToken>()
        .map(|token| token.to_rgb())
        .unwrap_or([0, 0, 0])
}

/// Piecewise channel function over six 60-degree hue segments.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue,
            self.saturation * 100.0,
            self.lightness * 100.0
        )
    }
}

impl FromStr for ColorToken {
    type Err = RasterError;

    /// Parse `hsl(<hue>, <saturation>%, <lightness>%)`. Decimal values are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RasterError::UnparseableColor(s.to_string());

        let inner = s
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;

        let mut parts = inner.split(',').map(str::trim);
        let (Some(h), Some(sat), Some(light), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        let number = |v: &str| v.parse::<f64>().ok().filter(|n| n.is_finite());
        let percent = |v: &str| v.strip_suffix('%').and_then(number);

        let hue = number(h).ok_or_else(err)?;
        let saturation = percent(sat).ok_or_else(err)?;
        let lightness = percent(light).ok_or_else(err)?;

        Ok(Self::new(hue, saturation / 100.0, lightness / 100.0))
    }
}
