//! Seedable Xorshift64 generator for the scatter effect.
//!
//! Scatter positions come from this generator instead of a thread-local RNG so
//! a recorded session (seed + commands) replays to identical particle state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of xorshift and is replaced by a non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new generator. A zero seed uses the fallback.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform point in `[0, width) × [0, height)`. x is drawn before y.
    pub fn next_point(&mut self, width: f64, height: f64) -> DVec2 {
        let x = self.next_range(0.0, width);
        let y = self.next_range(0.0, height);
        DVec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Changing this value invalidates every recorded scatter replay.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn same_seed_same_points() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..500 {
            assert_eq!(
                a.next_point(640.0, 480.0),
                b.next_point(640.0, 480.0),
                "points diverged at index {i}"
            );
        }
    }

    #[test]
    fn next_point_stays_inside_surface() {
        let mut rng = Xorshift64::new(12345);
        for _ in 0..10_000 {
            let p = rng.next_point(320.0, 200.0);
            assert!((0.0..320.0).contains(&p.x), "x = {} out of range", p.x);
            assert!((0.0..200.0).contains(&p.y), "y = {} out of range", p.y);
        }
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "next_range({min}, {max}) = {v}");
                }
            }
        }
    }
}
