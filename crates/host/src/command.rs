//! Input and lifecycle triggers delivered to the render loop.

use dissolve_core::{FieldConfig, Image};

/// Something the surrounding UI wants the field to do.
///
/// Commands are queued and applied at the start of the next tick, so input
/// sources never touch the simulation between `draw` and `update`.
#[derive(Debug, Clone)]
pub enum Command {
    /// Pointer moved to `(x, y)` in surface coordinates.
    PointerMove { x: f64, y: f64 },
    /// Pointer left the surface or entered UI chrome.
    PointerLeave,
    /// Teleport every particle to a random position ("scatter").
    Scatter,
    /// Re-sample: with an image, swap it in; without, resample the current one.
    Reinit(Option<Image>),
    /// New settings from the menu. Normalized before use, then re-initializes.
    Configure(FieldConfig),
}

impl Command {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PointerMove { .. } => "pointer-move",
            Command::PointerLeave => "pointer-leave",
            Command::Scatter => "scatter",
            Command::Reinit(_) => "reinit",
            Command::Configure(_) => "configure",
        }
    }
}
