//! Viewer options with TOML file support.
//!
//! Camera behaviour, mesh tessellation, display settings and key bindings
//! are consolidated here. Every section uses `#[serde(default)]` so
//! partial TOML files (e.g. only overriding `[camera]`) work.

mod camera;
mod display;
mod geometry;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::{DisplayOptions, VisualizationMode};
pub use geometry::GeometryOptions;
use serde::{Deserialize, Serialize};

use crate::error::MolscopeError;
use crate::input::KeyBindings;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Sphere and ribbon tessellation.
    pub geometry: GeometryOptions,
    /// Initial mode, background and diagnostics cadence.
    pub display: DisplayOptions,
    /// Key chord → command bindings.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MolscopeError> {
        let content = std::fs::read_to_string(path).map_err(MolscopeError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, MolscopeError> {
        toml::from_str(content)
            .map_err(|e| MolscopeError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MolscopeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolscopeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolscopeError::Io)?;
        }
        std::fs::write(path, content).map_err(MolscopeError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ViewerCommand;
    use crate::util::easing::EasingFunction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
max_distance = 250.0
focus_easing = "linear"

[display]
mode = "ribbon"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.max_distance, 250.0);
        assert_eq!(opts.camera.focus_easing, EasingFunction::Linear);
        assert_eq!(opts.display.mode, VisualizationMode::Ribbon);
        // Everything else should be default
        assert_eq!(opts.camera.min_distance, 1.0);
        assert_eq!(opts.geometry, GeometryOptions::default());
        assert_eq!(opts.keybindings, KeyBindings::default());
    }

    #[test]
    fn keybinding_override() {
        let toml_str = r#"
[keybindings.bindings]
KeyX = "reset_camera"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyX"),
            Some(ViewerCommand::ResetCamera)
        );
        assert_eq!(
            opts.keybindings.lookup("KeyR"),
            Some(ViewerCommand::ResetCamera)
        );
        assert_eq!(
            opts.keybindings.lookup("KeyV"),
            Some(ViewerCommand::ToggleMode)
        );
        assert!(opts.keybindings.lookup("ArrowLeft").is_some());
    }

    #[test]
    fn keybinding_rebinds_existing_chord() {
        let toml_str = r#"
[keybindings.bindings]
KeyV = "reset_camera"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyV"),
            Some(ViewerCommand::ResetCamera)
        );
        assert!(opts.keybindings.lookup("Escape").is_some());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, MolscopeError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("molscope-options-{}", std::process::id()));
        let path = dir.join("view.toml");
        let mut opts = Options::default();
        opts.camera.fovy = 60.0;
        opts.display.background = [1.0, 1.0, 1.0];
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn distance_clamp() {
        let camera = CameraOptions::default();
        assert_eq!(camera.clamp_distance(0.0), camera.min_distance);
        assert_eq!(camera.clamp_distance(1e9), camera.max_distance);
        assert_eq!(camera.clamp_distance(10.0), 10.0);
    }
}
