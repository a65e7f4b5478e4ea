//! RGBA8 color sampled from source images.
//!
//! Particles keep the exact bytes read from the surface at sampling time, so
//! the color type is 8-bit per channel with no color-space conversion.

use crate::error::DissolveError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight (non-premultiplied) RGBA color, 8 bits per channel.
///
/// Serializes as a hex string: `"#rrggbb"` when fully opaque, `"#rrggbbaa"`
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the cleared state of a surface.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// Creates a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads a color from the first four bytes of an RGBA8 slice.
    ///
    /// Returns `None` if the slice is shorter than four bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, a, ..] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Returns the channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True when the alpha channel is zero. Such pixels never produce particles.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parses `"#rrggbb"` or `"#rrggbbaa"` (leading `#` optional, case insensitive).
    ///
    /// Six-digit input is treated as fully opaque.
    pub fn from_hex(hex: &str) -> Result<Rgba, DissolveError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(DissolveError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            hex.get(range)
                .ok_or_else(|| DissolveError::InvalidColor(format!("invalid {name} component")))
                .and_then(|s| {
                    u8::from_str_radix(s, 16).map_err(|e| {
                        DissolveError::InvalidColor(format!("invalid {name} component: {e}"))
                    })
                })
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        let a = if hex.len() == 8 {
            channel(6..8, "alpha")?
        } else {
            255
        };
        Ok(Rgba::new(r, g, b, a))
    }

    /// Formats as `"#rrggbb"` for opaque colors and `"#rrggbbaa"` otherwise.
    pub fn to_hex(self) -> String {
        let Rgba { r, g, b, a } = self;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// CSS fill-style string in the form `rgb(r, g, b, a)`.
    ///
    /// The alpha slot carries the raw byte, not a 0..1 fraction.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Composites `self` over `dst` with straight-alpha source-over.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => return self,
            0 => return dst,
            _ => {}
        }
        let sa = self.a as f64 / 255.0;
        let da = dst.a as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let mix = |s: u8, d: u8| {
            let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Hex parsing ────────────────────────────────────────────────

    #[test]
    fn from_hex_six_digits_is_opaque() {
        let c = Rgba::from_hex("#ff8000").unwrap();
        assert_eq!(c, Rgba::new(255, 128, 0, 255));
    }

    #[test]
    fn from_hex_eight_digits_reads_alpha() {
        let c = Rgba::from_hex("10203040").unwrap();
        assert_eq!(c, Rgba::new(0x10, 0x20, 0x30, 0x40));
    }

    #[test]
    fn from_hex_is_case_insensitive() {
        assert_eq!(
            Rgba::from_hex("#ABCDEF").unwrap(),
            Rgba::from_hex("#abcdef").unwrap()
        );
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Rgba::from_hex("#fff"),
            Err(DissolveError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Rgba::from_hex("#gg0000").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        assert!(Rgba::from_hex("ééé").is_err());
    }

    #[test]
    fn to_hex_omits_alpha_when_opaque() {
        assert_eq!(Rgba::new(1, 2, 3, 255).to_hex(), "#010203");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn to_css_uses_raw_alpha_byte() {
        assert_eq!(Rgba::new(12, 34, 56, 200).to_css(), "rgb(12, 34, 56, 200)");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = Rgba::new(255, 0, 170, 128);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ff00aa80\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn from_slice_requires_four_bytes() {
        assert_eq!(Rgba::from_slice(&[1, 2, 3]), None);
        assert_eq!(Rgba::from_slice(&[1, 2, 3, 4, 5]), Some(Rgba::new(1, 2, 3, 4)));
    }

    // ── Compositing ────────────────────────────────────────────────

    #[test]
    fn opaque_source_replaces_destination() {
        assert_eq!(Rgba::WHITE.over(Rgba::BLACK), Rgba::WHITE);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let dst = Rgba::new(9, 8, 7, 6);
        assert_eq!(Rgba::TRANSPARENT.over(dst), dst);
    }

    #[test]
    fn anything_over_transparent_keeps_source_color() {
        let src = Rgba::new(200, 100, 50, 128);
        assert_eq!(src.over(Rgba::TRANSPARENT), src);
    }

    #[test]
    fn half_white_over_black_is_mid_gray() {
        let out = Rgba::new(255, 255, 255, 128).over(Rgba::BLACK);
        assert_eq!(out.a, 255);
        assert!((out.r as i32 - 128).abs() <= 1, "r = {}", out.r);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_round_trip_is_lossless(r: u8, g: u8, b: u8, a: u8) {
                let c = Rgba::new(r, g, b, a);
                prop_assert_eq!(Rgba::from_hex(&c.to_hex()).unwrap(), c);
            }

            #[test]
            fn over_opaque_destination_stays_opaque(
                r: u8, g: u8, b: u8, a: u8,
            ) {
                let out = Rgba::new(r, g, b, a).over(Rgba::BLACK);
                prop_assert_eq!(out.a, 255);
            }
        }
    }
}
