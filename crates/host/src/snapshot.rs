//! PNG input and output for the dissolve field.
//!
//! Feature-gated behind `png` (default on) so embedders that bring their own
//! decoder can depend on this crate without pulling in the `image` crate.
//! The flattening itself lives in [`crate::pixel`] (always available).

use dissolve_core::{DissolveError, Image, Raster, Rgba, Surface};
use std::path::Path;

use crate::pixel::flatten_rgba;

/// Decodes an image file into an RGBA8 [`Image`].
///
/// Returns `DissolveError::Io` if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<Image, DissolveError> {
    let decoded = image::open(path)
        .map_err(|e| DissolveError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = decoded.dimensions();
    Image::from_rgba(w as usize, h as usize, decoded.into_raw())
}

/// Writes the raster as a PNG, flattened over an opaque `background`.
///
/// Returns `DissolveError::InvalidDimensions` if the raster dimensions
/// overflow `u32`, or `DissolveError::Io` on write failure.
pub fn write_png(raster: &Raster, background: Rgba, path: &Path) -> Result<(), DissolveError> {
    let rgba = flatten_rgba(raster, background);
    let w = u32::try_from(raster.width()).map_err(|_| DissolveError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| DissolveError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| DissolveError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| DissolveError::Io(format!("{}: {e}", path.display())))
}
