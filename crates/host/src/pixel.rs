//! Pure-computation flattening of a [`Raster`] onto an opaque background.
//!
//! Always available (no feature gate) so any output path, PNG or otherwise,
//! shares the same conversion.

use dissolve_core::{Raster, Rgba};

/// Composites every raster pixel over `background` and returns RGBA8 bytes.
///
/// The background is forced opaque, so every output alpha byte is 255. The
/// buffer length is `width * height * 4`.
pub fn flatten_rgba(raster: &Raster, background: Rgba) -> Vec<u8> {
    let base = Rgba { a: 255, ..background };
    raster
        .data()
        .chunks_exact(4)
        .flat_map(|px| {
            Rgba::from_slice(px)
                .map(|c| c.over(base))
                .unwrap_or(base)
                .to_array()
        })
        .collect()
}
