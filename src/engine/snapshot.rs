//! Read-only view of the viewer for overlays and diagnostics.

use serde::Serialize;

use crate::options::VisualizationMode;
use crate::renderer::BufferCounts;
use crate::structure::AtomRecord;

/// Metadata of the selected atom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedAtom {
    /// Atom index.
    pub index: usize,
    /// Atom name, e.g. `"CA"`.
    pub atom_name: String,
    /// Element symbol.
    pub element: String,
    /// Residue name.
    pub residue_name: String,
    /// Residue sequence number.
    pub residue_number: i32,
    /// Chain identifier.
    pub chain_id: String,
    /// World-space position.
    pub position: [f32; 3],
}

impl From<&AtomRecord> for SelectedAtom {
    fn from(atom: &AtomRecord) -> Self {
        Self {
            index: atom.index,
            atom_name: atom.atom_name.clone(),
            element: atom.element.clone(),
            residue_name: atom.residue_name.clone(),
            residue_number: atom.residue_number,
            chain_id: atom.chain_id.clone(),
            position: atom.position.to_array(),
        }
    }
}

/// Snapshot handed to overlay surfaces. Never fed back into the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    /// Name of the displayed structure.
    pub source: Option<String>,
    /// Active representation.
    pub mode: VisualizationMode,
    /// Number of atoms in the displayed structure.
    pub atom_count: usize,
    /// GPU buffer element counts.
    pub buffers: BufferCounts,
    /// Camera pitch and yaw in radians.
    pub rotation: [f32; 2],
    /// Camera orbit distance.
    pub distance: f32,
    /// Camera pan offset.
    pub position: [f32; 3],
    /// Camera orbit centre.
    pub target: [f32; 3],
    /// Selected atom, if any.
    pub selected: Option<SelectedAtom>,
    /// Smoothed frames per second.
    pub fps: f32,
    /// Whether a structure is being loaded.
    pub loading: bool,
    /// Last load error, until dismissed.
    pub error: Option<String>,
}

impl ViewSnapshot {
    /// Compact JSON for log lines.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_carries_camera_and_selection() {
        let snapshot = ViewSnapshot {
            source: Some("1abc.pdb".to_owned()),
            mode: VisualizationMode::Ribbon,
            atom_count: 3,
            buffers: BufferCounts {
                instances: 3,
                ..BufferCounts::default()
            },
            rotation: [0.5, 0.0],
            distance: 20.0,
            position: [0.0; 3],
            target: [1.0, 2.0, 3.0],
            selected: None,
            fps: 60.0,
            loading: false,
            error: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&snapshot.to_json()).unwrap();
        assert_eq!(value["mode"], "ribbon");
        assert_eq!(value["buffers"]["instances"], 3);
        assert_eq!(value["distance"], 20.0);
        assert!(value["selected"].is_null());
    }
}
