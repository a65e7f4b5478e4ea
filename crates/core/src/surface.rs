//! Raster surface the field draws onto and samples from.
//!
//! [`Surface`] is the seam between the simulation and whatever paints pixels:
//! the in-memory [`Raster`] for headless rendering and tests, or a host
//! canvas. The trait is object-safe so hosts can hand the field a
//! `Box<dyn Surface>`.

use glam::DVec2;

use crate::color::Rgba;
use crate::error::DissolveError;
use crate::image::{rgba_len, Image};

/// A 2D RGBA raster supporting the four operations the field needs.
///
/// Drawing is single-threaded: implementations are not expected to tolerate
/// re-entrant calls.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> usize;

    /// Surface height in pixels.
    fn height(&self) -> usize;

    /// Sets a region to fully transparent. The region is clipped to the surface.
    fn clear(&mut self, x: usize, y: usize, width: usize, height: usize);

    /// Composites `image` with its top-left corner at `offset` (floored to whole pixels).
    fn draw_image(&mut self, image: &Image, offset: DVec2);

    /// Reads a region as row-major RGBA8 bytes (`width * height * 4` long).
    ///
    /// Pixels outside the surface read as transparent.
    fn read_pixels(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8>;

    /// Fills an axis-aligned rectangle with `color` using source-over compositing.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    /// Clears the whole surface.
    fn clear_all(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear(0, 0, w, h);
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn clear(&mut self, x: usize, y: usize, width: usize, height: usize) {
        (**self).clear(x, y, width, height)
    }

    fn draw_image(&mut self, image: &Image, offset: DVec2) {
        (**self).draw_image(image, offset)
    }

    fn read_pixels(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8> {
        (**self).read_pixels(x, y, width, height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        (**self).fill_rect(x, y, width, height, color)
    }
}

/// In-memory RGBA8 surface, row-major, starting fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a transparent raster.
    ///
    /// Returns `DissolveError::InvalidDimensions` if either dimension is zero
    /// or the byte length overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, DissolveError> {
        let len = rgba_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Read-only access to the row-major RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Rgba::from_slice(&self.data[idx..idx + 4])
    }

    /// Number of pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 4
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let idx = self.index(x, y);
        let dst = Rgba::from_slice(&self.data[idx..idx + 4]).unwrap_or_default();
        self.data[idx..idx + 4].copy_from_slice(&color.over(dst).to_array());
    }

    /// Clamps a half-open pixel span `[start, end)` given in f64 to the surface axis.
    fn span(start: f64, end: f64, limit: usize) -> Option<(usize, usize)> {
        if !(start.is_finite() && end.is_finite()) {
            return None;
        }
        let lo = start.round().clamp(0.0, limit as f64) as usize;
        let hi = end.round().clamp(0.0, limit as f64) as usize;
        (lo < hi).then_some((lo, hi))
    }
}

impl Surface for Raster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self, x: usize, y: usize, width: usize, height: usize) {
        let x1 = x.saturating_add(width).min(self.width);
        let y1 = y.saturating_add(height).min(self.height);
        if x >= x1 || y >= y1 {
            return;
        }
        for row in y..y1 {
            let start = self.index(x, row);
            let end = self.index(x1, row);
            self.data[start..end].fill(0);
        }
    }

    fn draw_image(&mut self, image: &Image, offset: DVec2) {
        if !offset.is_finite() {
            return;
        }
        let ox = offset.x.floor() as i64;
        let oy = offset.y.floor() as i64;
        for iy in 0..image.height() {
            let dy = oy + iy as i64;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            for ix in 0..image.width() {
                let dx = ox + ix as i64;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }
                if let Some(color) = image.pixel(ix, iy) {
                    self.blend(dx as usize, dy as usize, color);
                }
            }
        }
    }

    fn read_pixels(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8> {
        let mut out = vec![0u8; width * height * 4];
        for row in 0..height {
            let sy = y + row;
            if sy >= self.height {
                break;
            }
            let x1 = x.saturating_add(width).min(self.width);
            if x >= x1 {
                break;
            }
            let (start, end) = (self.index(x, sy), self.index(x1, sy));
            let dst = row * width * 4;
            out[dst..dst + (end - start)].copy_from_slice(&self.data[start..end]);
        }
        out
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        if color.is_transparent() {
            return;
        }
        let Some((x0, x1)) = Self::span(x, x + width, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::span(y, y + height, self.height) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }
}
