//! The viewer's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is a `ViewerCommand`. Consumers build
//! commands and pass them to
//! [`ViewerState::execute`](super::state::ViewerState::execute).

use glam::Vec2;

use crate::options::VisualizationMode;

/// A discrete or parameterized operation the viewer can perform.
///
/// ```ignore
/// state.execute(ViewerCommand::Zoom { delta: 1.0 }, Instant::now());
/// state.execute(ViewerCommand::ToggleMode, Instant::now());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit by `delta` pixels of pointer movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan by `delta` pixels of pointer movement (with momentum).
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan one discrete step; `direction` is a unit screen direction
    /// scaled by the configured arrow-key step.
    PanStep {
        /// Screen-space direction (x right, y down).
        direction: Vec2,
    },

    /// Zoom (positive = in, negative = out).
    Zoom {
        /// Scroll amount; only the sign is used.
        delta: f32,
    },

    /// Recentre on the loaded structure, or the default pose when empty.
    ResetCamera,

    // ── Picking ─────────────────────────────────────────────────────
    /// Pick the atom under a pointer position and recentre on it.
    Pick {
        /// Pointer x in physical pixels.
        x: f32,
        /// Pointer y in physical pixels.
        y: f32,
    },

    // ── Display ─────────────────────────────────────────────────────
    /// Switch to a specific visualization mode.
    SetMode(VisualizationMode),

    /// Flip between spheres and ribbon.
    ToggleMode,

    /// Toggle periodic diagnostics snapshots.
    ToggleDiagnostics,

    /// Clear the last load error.
    DismissError,
}
