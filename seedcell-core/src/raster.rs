//! Pixel buffers owned by a generation run.

use std::path::Path;

use crate::{Result, Rgb, Rgba};

/// Value of a pixel nothing has been written to
pub const UNSET: Rgba = [0, 0, 0, 0];

/// Row-major RGBA8 pixel buffer.
///
/// A zero width or height is allowed; every fill over such a raster is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pub(crate) pixels: Vec<u8>,
}

impl Raster {
    /// Raster with every pixel unset
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Raster cleared to an opaque background
    pub fn filled(width: u32, height: u32, background: Rgb) -> Self {
        let mut raster = Self::new(width, height);
        raster.clear(background);
        raster
    }

    /// Pre-run clear: paint every pixel with `background`.
    pub fn clear(&mut self, background: Rgb) {
        let [r, g, b] = background;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Length of the diagonal, the largest distance between two points of the raster
    pub fn diagonal(&self) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        (w * w + h * h).sqrt()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy into an `image::RgbaImage`
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("raster buffer always holds width * height * 4 bytes")
    }

    /// Save as an image file, format chosen from the extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

/// Which pixels of a raster have their nearest seed decided, and which seed
/// that is.
///
/// Marks are only ever added: once a pixel is resolved it stays resolved
/// with the same owner for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSet {
    width: u32,
    height: u32,
    /// Owning seed index for each pixel (row-major), -1 while unresolved
    pub(crate) owner_of: Vec<i32>,
    pub(crate) count: usize,
}

impl ResolvedSet {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            owner_of: vec![-1; width as usize * height as usize],
            count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.owner(x, y).is_some()
    }

    /// Seed index a resolved pixel belongs to; `None` when unresolved or out of bounds
    pub fn owner(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let cell = self.owner_of[y as usize * self.width as usize + x as usize];
        (cell >= 0).then_some(cell as usize)
    }

    /// Number of resolved pixels
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.owner_of.len()
    }

    /// Fraction of the raster resolved so far, 1.0 for an empty raster
    pub fn fraction(&self) -> f64 {
        if self.owner_of.is_empty() {
            1.0
        } else {
            self.count as f64 / self.owner_of.len() as f64
        }
    }

    /// Record `owner` for an unresolved pixel. Returns false and leaves the
    /// set unchanged if the pixel is out of bounds or already resolved.
    pub(crate) fn mark(&mut self, x: u32, y: u32, owner: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let cell = &mut self.owner_of[y as usize * self.width as usize + x as usize];
        if *cell >= 0 {
            return false;
        }
        *cell = owner as i32;
        self.count += 1;
        true
    }
}
