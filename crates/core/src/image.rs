//! Decoded source image handed to the field for sampling.

use crate::color::Rgba;
use crate::error::DissolveError;

/// An RGBA8 image in row-major order.
///
/// Decoding from a file format is the host's job; the core only needs the
/// dimensions and the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Image {
    /// Wraps an RGBA8 buffer, checking that `data.len() == width * height * 4`.
    ///
    /// Returns `DissolveError::InvalidDimensions` for zero or overflowing
    /// dimensions, and `DissolveError::BufferLength` for a buffer of the
    /// wrong length.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DissolveError> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(DissolveError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image filled with a single color.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Result<Self, DissolveError> {
        let len = rgba_len(width, height)?;
        let data = color.to_array().iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a fully transparent image.
    pub fn transparent(width: usize, height: usize) -> Result<Self, DissolveError> {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Rgba::from_slice(&self.data[idx..idx + 4])
    }

    /// Sets the color at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 4;
        self.data[idx..idx + 4].copy_from_slice(&color.to_array());
    }
}

/// Byte length of a `width × height` RGBA8 buffer.
pub(crate) fn rgba_len(width: usize, height: usize) -> Result<usize, DissolveError> {
    if width == 0 || height == 0 {
        return Err(DissolveError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(DissolveError::InvalidDimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_accepts_matching_buffer() {
        let img = Image::from_rgba(2, 3, vec![0; 24]).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.data().len(), 24);
    }

    #[test]
    fn from_rgba_rejects_wrong_length() {
        let result = Image::from_rgba(2, 2, vec![0; 15]);
        assert!(matches!(
            result,
            Err(DissolveError::BufferLength {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn from_rgba_rejects_zero_dimensions() {
        assert!(matches!(
            Image::from_rgba(0, 4, Vec::new()),
            Err(DissolveError::InvalidDimensions)
        ));
    }

    #[test]
    fn from_rgba_rejects_overflow() {
        assert!(matches!(
            Image::from_rgba(usize::MAX, 2, Vec::new()),
            Err(DissolveError::InvalidDimensions)
        ));
    }

    #[test]
    fn filled_repeats_color() {
        let c = Rgba::new(1, 2, 3, 4);
        let img = Image::filled(3, 2, c).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(img.pixel(x, y), Some(c));
            }
        }
    }

    #[test]
    fn pixel_outside_is_none() {
        let img = Image::transparent(4, 4).unwrap();
        assert_eq!(img.pixel(4, 0), None);
        assert_eq!(img.pixel(0, 4), None);
    }

    #[test]
    fn set_pixel_writes_row_major() {
        let mut img = Image::transparent(3, 3).unwrap();
        img.set_pixel(2, 1, Rgba::WHITE);
        let idx = (3 + 2) * 4;
        assert_eq!(&img.data()[idx..idx + 4], &[255, 255, 255, 255]);
        img.set_pixel(9, 9, Rgba::WHITE);
    }
}
