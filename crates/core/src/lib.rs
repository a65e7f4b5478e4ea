#![deny(unsafe_code)]
//! Core of the dissolve effect: an image rendered as color-sampled particles
//! that scatter away from a pointer and relax back to where they came from.
//!
//! Provides [`ParticleField`] (sampling, per-frame cycle, pointer plumbing),
//! [`Particle`] (the integration step), the [`Surface`] raster seam with an
//! in-memory [`Raster`], [`FieldConfig`] with pure normalization, [`Image`],
//! [`Rgba`], and the seedable [`Xorshift64`] used for scatter.
//!
//! The core has no scheduling of its own: a host calls `draw` and `update`
//! once per frame.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod image;
pub mod params;
pub mod particle;
pub mod pointer;
pub mod prng;
pub mod surface;

pub use color::Rgba;
pub use config::FieldConfig;
pub use error::DissolveError;
pub use field::ParticleField;
pub use image::Image;
pub use particle::Particle;
pub use pointer::{Pointer, PointerInput, Zone};
pub use prng::Xorshift64;
pub use surface::{Raster, Surface};
