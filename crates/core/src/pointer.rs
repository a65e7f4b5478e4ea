//! Pointer state shared by every particle, and the input filter that feeds it.
//!
//! The field only ever sees a pointer *sample*: a position or nothing.
//! [`PointerInput`] turns raw move events into samples, dropping moves that
//! land on UI chrome registered as a [`Zone`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Pointer position (absent when outside the interactive region) plus the
/// influence radius fixed at the last init.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub position: Option<DVec2>,
    /// Squared-distance threshold for repulsion.
    pub radius: f64,
}

impl Pointer {
    /// An absent pointer with the given influence radius.
    pub fn new(radius: f64) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Zone {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Converts raw pointer events into pointer samples.
///
/// Moves inside an excluded zone produce an absent sample, the same as the
/// pointer leaving the surface.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    excluded: Vec<Zone>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zone whose pointer movements must not reach the physics.
    pub fn exclude(&mut self, zone: Zone) {
        self.excluded.push(zone);
    }

    /// Builder form of [`exclude`](Self::exclude).
    pub fn with_excluded(mut self, zone: Zone) -> Self {
        self.excluded.push(zone);
        self
    }

    pub fn excluded(&self) -> &[Zone] {
        &self.excluded
    }

    /// Sample for a pointer move to `(x, y)`.
    ///
    /// Non-finite coordinates are treated like a move onto excluded chrome.
    pub fn on_move(&self, x: f64, y: f64) -> Option<DVec2> {
        let point = DVec2::new(x, y);
        if !point.is_finite() || self.excluded.iter().any(|z| z.contains(point)) {
            return None;
        }
        Some(point)
    }

    /// Sample for the pointer leaving the interactive region.
    pub fn on_leave(&self) -> Option<DVec2> {
        None
    }
}
