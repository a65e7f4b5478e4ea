//! Field configuration: sampling gap, pointer influence radius, and friction.
//!
//! Configuration is an explicit value handed to the field at construction and
//! on every re-init. Normalization is a pure function, kept apart from
//! wherever the values were loaded from.

use crate::error::DissolveError;
use crate::params::{param_f64, param_usize};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default pixel stride between sampled particles.
pub const DEFAULT_SAMPLING_GAP: usize = 5;
/// Default squared-distance threshold for pointer repulsion.
pub const DEFAULT_INFLUENCE_RADIUS: f64 = 3000.0;
/// Default per-frame velocity damping factor.
pub const DEFAULT_FRICTION: f64 = 0.9;

/// Menu-unit fallbacks, applied before scaling.
const MENU_DEFAULT_RADIUS: f64 = 3.0;
const MENU_DEFAULT_FRICTION: f64 = 90.0;
/// The settings menu edits the radius in thousands.
const MENU_RADIUS_SCALE: f64 = 1000.0;
/// The settings menu edits friction as a percentage.
const MENU_FRICTION_SCALE: f64 = 0.01;

/// The three tunables that shape the dissolve effect.
///
/// Use [`Default`] for the stock look (gap 5, radius 3000, friction 0.9).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Pixel stride between sampled particles; also each particle's size.
    pub sampling_gap: usize,
    /// Squared-distance threshold inside which the pointer repels particles.
    pub influence_radius: f64,
    /// Velocity multiplier applied every frame, in (0, 1].
    pub friction: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            sampling_gap: DEFAULT_SAMPLING_GAP,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
            friction: DEFAULT_FRICTION,
        }
    }
}

impl FieldConfig {
    /// Creates a config from raw values without normalizing them.
    pub fn new(sampling_gap: usize, influence_radius: f64, friction: f64) -> Self {
        Self {
            sampling_gap,
            influence_radius,
            friction,
        }
    }

    /// Returns a copy with every unusable value replaced.
    ///
    /// - `sampling_gap == 0` becomes the default gap
    /// - a non-positive or non-finite radius becomes the default radius
    /// - a non-positive or non-finite friction becomes the default friction
    /// - friction above 1 is clamped to 1
    pub fn normalized(self) -> Self {
        let sampling_gap = if self.sampling_gap == 0 {
            warn!("sampling_gap 0 replaced by {DEFAULT_SAMPLING_GAP}");
            DEFAULT_SAMPLING_GAP
        } else {
            self.sampling_gap
        };
        let influence_radius = positive_or(
            self.influence_radius,
            DEFAULT_INFLUENCE_RADIUS,
            "influence_radius",
        );
        let friction = positive_or(self.friction, DEFAULT_FRICTION, "friction").min(1.0);
        Self {
            sampling_gap,
            influence_radius,
            friction,
        }
    }

    /// Builds a config from settings-menu units.
    ///
    /// The menu edits the radius in thousands and friction in percent. A
    /// non-positive size falls back to 5, radius to 3 (3000 after scaling),
    /// and friction to 90 (0.9 after scaling).
    pub fn from_menu_units(size: f64, radius_thousands: f64, friction_percent: f64) -> Self {
        let gap = if size > 0.0 && size.is_finite() {
            size.round().max(1.0) as usize
        } else {
            DEFAULT_SAMPLING_GAP
        };
        let radius = if radius_thousands > 0.0 {
            radius_thousands
        } else {
            MENU_DEFAULT_RADIUS
        };
        let friction = if friction_percent > 0.0 {
            friction_percent
        } else {
            MENU_DEFAULT_FRICTION
        };
        Self::new(gap, radius * MENU_RADIUS_SCALE, friction * MENU_FRICTION_SCALE).normalized()
    }

    /// Converts back to settings-menu units `(size, radius_thousands, friction_percent)`.
    pub fn to_menu_units(&self) -> (f64, f64, f64) {
        (
            self.sampling_gap as f64,
            self.influence_radius / MENU_RADIUS_SCALE,
            self.friction / MENU_FRICTION_SCALE,
        )
    }

    /// Extracts a config from a JSON object, falling back to defaults for
    /// missing or mistyped keys, then normalizes.
    pub fn from_json(params: &Value) -> Self {
        Self {
            sampling_gap: param_usize(params, "sampling_gap", DEFAULT_SAMPLING_GAP),
            influence_radius: param_f64(params, "influence_radius", DEFAULT_INFLUENCE_RADIUS),
            friction: param_f64(params, "friction", DEFAULT_FRICTION),
        }
        .normalized()
    }

    /// Overlays keys present in `params` onto `self`, then normalizes.
    pub fn merged_with(self, params: &Value) -> Self {
        Self {
            sampling_gap: param_usize(params, "sampling_gap", self.sampling_gap),
            influence_radius: param_f64(params, "influence_radius", self.influence_radius),
            friction: param_f64(params, "friction", self.friction),
        }
        .normalized()
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "sampling_gap": self.sampling_gap,
            "influence_radius": self.influence_radius,
            "friction": self.friction,
        })
    }

    /// Schema describing every setting: type, range, default, description.
    pub fn param_schema() -> Value {
        json!({
            "sampling_gap": {
                "type": "integer",
                "default": DEFAULT_SAMPLING_GAP,
                "min": 1,
                "description": "Pixel stride between sampled particles; also each particle's size"
            },
            "influence_radius": {
                "type": "number",
                "default": DEFAULT_INFLUENCE_RADIUS,
                "min": 0.0,
                "exclusive_min": true,
                "description": "Squared-distance threshold inside which the pointer repels particles"
            },
            "friction": {
                "type": "number",
                "default": DEFAULT_FRICTION,
                "min": 0.0,
                "max": 1.0,
                "exclusive_min": true,
                "description": "Velocity multiplier applied every frame"
            }
        })
    }

    /// Checks that the field can sample and simulate with these values.
    ///
    /// Returns `DissolveError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> Result<(), DissolveError> {
        if self.sampling_gap == 0 {
            return Err(DissolveError::InvalidConfig(
                "sampling_gap must be greater than 0".into(),
            ));
        }
        if !(self.influence_radius.is_finite() && self.influence_radius > 0.0) {
            return Err(DissolveError::InvalidConfig(format!(
                "influence_radius must be positive and finite, got {}",
                self.influence_radius
            )));
        }
        if !(self.friction.is_finite() && self.friction > 0.0 && self.friction <= 1.0) {
            return Err(DissolveError::InvalidConfig(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

fn positive_or(value: f64, default: f64, name: &str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("{name} {value} replaced by {default}");
        default
    }
}
