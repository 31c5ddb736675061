use serde::{Deserialize, Serialize};

/// Which representation the frame pipeline draws.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationMode {
    /// One instanced sphere per atom.
    #[default]
    Spheres,
    /// Spline-extruded backbone ribbon.
    Ribbon,
}

impl VisualizationMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Spheres => Self::Ribbon,
            Self::Ribbon => Self::Spheres,
        }
    }

    /// Flag passed to the shader to select the color source.
    #[must_use]
    pub fn shader_flag(self) -> u32 {
        match self {
            Self::Spheres => 0,
            Self::Ribbon => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Display settings.
pub struct DisplayOptions {
    /// Representation shown after startup.
    pub mode: VisualizationMode,
    /// Clear color (linear RGB).
    pub background: [f32; 3],
    /// Seconds between diagnostic snapshot log lines.
    pub diagnostics_interval_secs: f32,
    /// Synchronise presentation with the display refresh.
    pub vsync: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            mode: VisualizationMode::Spheres,
            background: [0.08, 0.08, 0.1],
            diagnostics_interval_secs: 1.0,
            vsync: true,
        }
    }
}
