//! A single image-sampled particle and its per-frame integration step.
//!
//! Each frame a particle is pushed away from the pointer (when inside the
//! influence radius), its velocity is damped by friction, and a fixed
//! fraction of its offset from origin is applied as a corrective step:
//!
//! ```text
//! d      = |pointer - p|²
//! force  = -radius / d                      (only when d < radius)
//! v     += force · (cos θ, sin θ),  θ = atan2(pointer - p)
//! v     *= friction
//! p     += v + (origin - p) · 0.02
//! ```
//!
//! The force law is a visual tuning, not a physical one. Keep it exact.

use glam::DVec2;

use crate::color::Rgba;
use crate::pointer::Pointer;
use crate::prng::Xorshift64;
use crate::surface::Surface;

/// Fraction of the offset-to-origin applied each frame.
pub const RESTORE_RATE: f64 = 0.02;

/// Squared distances below this are treated as "pointer absent" for the
/// force term, so a pointer sitting on a particle never divides by zero.
const SINGULARITY_EPS: f64 = 1e-10;

/// A colored square that remembers where it was sampled from.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVec2,
    origin: DVec2,
    velocity: DVec2,
    color: Rgba,
    size: f64,
    friction: f64,
    restore_rate: f64,
}

impl Particle {
    /// Creates a particle at rest on its origin.
    pub fn new(origin: DVec2, color: Rgba, size: f64, friction: f64) -> Self {
        Self {
            position: origin,
            origin,
            velocity: DVec2::ZERO,
            color,
            size,
            friction,
            restore_rate: RESTORE_RATE,
        }
    }

    /// Current render position (top-left of the square).
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Sampling coordinates; never changes.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Edge length of the rendered square.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn restore_rate(&self) -> f64 {
        self.restore_rate
    }

    /// Distance from the current position to the origin.
    pub fn offset_from_origin(&self) -> f64 {
        self.position.distance(self.origin)
    }

    /// True when position and velocity are all finite numbers.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Paints the particle as a `size × size` square. Particle state is untouched.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_rect(
            self.position.x,
            self.position.y,
            self.size,
            self.size,
            self.color,
        );
    }

    /// Advances one frame against the shared pointer state.
    pub fn update(&mut self, pointer: &Pointer) {
        if let Some(target) = pointer.position {
            let delta = target - self.position;
            let d = delta.length_squared();
            if d >= SINGULARITY_EPS && d < pointer.radius {
                let force = -pointer.radius / d;
                // A huge radius over a tiny distance overflows; skip that push.
                if force.is_finite() {
                    let angle = delta.y.atan2(delta.x);
                    self.velocity.x += force * angle.cos();
                    self.velocity.y += force * angle.sin();
                }
            }
        }

        self.velocity *= self.friction;
        self.position += self.velocity + (self.origin - self.position) * self.restore_rate;
    }

    /// Teleports to a uniform random point in `[0, width) × [0, height)`.
    ///
    /// Velocity, origin, color, and size are kept; the restoration term
    /// brings the particle home over the following frames.
    pub fn rand(&mut self, width: f64, height: f64, rng: &mut Xorshift64) {
        self.position = rng.next_point(width, height);
    }
}
