//! The particle field: image sampling, pointer state, and the per-frame cycle.
//!
//! A [`ParticleField`] owns its drawing [`Surface`]. `init` paints the current
//! image centered on the surface, reads the pixels back, and keeps one
//! particle per non-transparent pixel on a `sampling_gap` grid. After that the
//! host calls `draw` and `update` once per frame and `rand` for a scatter.

use glam::DVec2;
use log::debug;

use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::DissolveError;
use crate::image::Image;
use crate::particle::Particle;
use crate::pointer::Pointer;
use crate::prng::Xorshift64;
use crate::surface::Surface;

/// Seed used by [`ParticleField::new`] for the scatter generator.
pub const DEFAULT_SCATTER_SEED: u64 = 0x00D1_5501_7E5E_ED00;

/// Image-sampled particles plus the pointer they react to.
///
/// Particles are stored in raster-scan order (row-major, top-to-bottom,
/// left-to-right). Every particle's size equals the sampling gap in effect
/// when it was created; changing configuration requires a re-init.
#[derive(Debug)]
pub struct ParticleField<S: Surface> {
    surface: S,
    width: usize,
    height: usize,
    config: FieldConfig,
    sampling_gap: usize,
    particles: Vec<Particle>,
    pointer: Pointer,
    image: Option<Image>,
    image_offset: DVec2,
    rng: Xorshift64,
}

impl<S: Surface> ParticleField<S> {
    /// Creates an empty field over `surface`.
    ///
    /// Dimensions are taken from the surface and fixed for the field's
    /// lifetime. Returns `DissolveError::InvalidDimensions` for an empty
    /// surface and `DissolveError::InvalidConfig` if `config` does not validate.
    pub fn new(surface: S, config: FieldConfig) -> Result<Self, DissolveError> {
        Self::with_seed(surface, config, DEFAULT_SCATTER_SEED)
    }

    /// Like [`new`](Self::new) with an explicit scatter seed, for replayable sessions.
    pub fn with_seed(surface: S, config: FieldConfig, seed: u64) -> Result<Self, DissolveError> {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(DissolveError::InvalidDimensions);
        }
        config.validate()?;
        Ok(Self {
            surface,
            width,
            height,
            config,
            sampling_gap: config.sampling_gap,
            particles: Vec::new(),
            pointer: Pointer::new(config.influence_radius),
            image: None,
            image_offset: DVec2::ZERO,
            rng: Xorshift64::new(seed),
        })
    }

    /// Rebuilds every particle from scratch.
    ///
    /// With `Some(image)` the image replaces the stored one and is centered on
    /// the surface; with `None` the stored image (if any) is resampled under
    /// the current configuration. The pointer is reset to absent. With no
    /// image at all the blank surface yields zero particles.
    ///
    /// The new particles are collected separately and swapped in only once
    /// sampling has finished.
    pub fn init(&mut self, image: Option<Image>) {
        if let Some(image) = image {
            self.image_offset = DVec2::new(
                self.width as f64 / 2.0 - image.width() as f64 / 2.0,
                self.height as f64 / 2.0 - image.height() as f64 / 2.0,
            );
            self.image = Some(image);
        }

        self.sampling_gap = self.config.sampling_gap;
        self.pointer = Pointer::new(self.config.influence_radius);

        self.surface.clear_all();
        if let Some(image) = &self.image {
            self.surface.draw_image(image, self.image_offset);
        }

        let particles = self.sample();
        debug!(
            "sampled {} particles from {}x{} surface (gap {})",
            particles.len(),
            self.width,
            self.height,
            self.sampling_gap
        );
        self.particles = particles;
    }

    /// Replaces the configuration and re-initializes from the stored image.
    ///
    /// Returns `DissolveError::InvalidConfig` (leaving the field untouched)
    /// if `config` does not validate.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), DissolveError> {
        config.validate()?;
        debug!("reconfigure: {config:?}");
        self.config = config;
        self.init(None);
        Ok(())
    }

    /// Raster-scans the surface on the sampling grid, keeping non-transparent pixels.
    fn sample(&self) -> Vec<Particle> {
        let pixels = self.surface.read_pixels(0, 0, self.width, self.height);
        let width = self.width;
        let gap = self.sampling_gap;
        let size = gap as f64;
        let friction = self.config.friction;

        (0..self.height)
            .step_by(gap)
            .flat_map(|y| (0..width).step_by(gap).map(move |x| (x, y)))
            .filter_map(|(x, y)| {
                let idx = (y * width + x) * 4;
                let color = pixels.get(idx..idx + 4).and_then(Rgba::from_slice)?;
                (!color.is_transparent()).then(|| {
                    Particle::new(DVec2::new(x as f64, y as f64), color, size, friction)
                })
            })
            .collect()
    }

    /// Draws every particle in order. The surface is not cleared first.
    pub fn draw(&mut self) {
        for particle in &self.particles {
            particle.draw(&mut self.surface);
        }
    }

    /// Advances every particle one frame against the current pointer.
    pub fn update(&mut self) {
        let pointer = self.pointer;
        for particle in &mut self.particles {
            particle.update(&pointer);
        }
    }

    /// Scatters every particle to a random position on the surface.
    pub fn rand(&mut self) {
        let (w, h) = (self.width as f64, self.height as f64);
        for particle in &mut self.particles {
            particle.rand(w, h, &mut self.rng);
        }
    }

    /// Moves the pointer to `(x, y)`. Non-finite coordinates clear it instead.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        let position = DVec2::new(x, y);
        self.pointer.position = position.is_finite().then_some(position);
    }

    /// Marks the pointer absent (left the surface or over excluded chrome).
    pub fn clear_pointer(&mut self) {
        self.pointer.position = None;
    }

    /// Pushes an explicit per-tick pointer sample.
    pub fn apply_pointer(&mut self, sample: Option<DVec2>) {
        match sample {
            Some(p) => self.set_pointer(p.x, p.y),
            None => self.clear_pointer(),
        }
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Particles in raster-scan order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Gap used by the most recent init.
    pub fn sampling_gap(&self) -> usize {
        self.sampling_gap
    }

    /// Top-left placement of the stored image.
    pub fn image_offset(&self) -> DVec2 {
        self.image_offset
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consumes the field, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
