//! CPU-side scene: the currently displayed structure.
//!
//! A load replaces the whole structure in one assignment, so readers never
//! observe atoms from one file mixed with the backbone of another. Ribbon
//! geometry is derived lazily and rebuilt from scratch whenever the
//! backbone changes.

pub mod loader;

use crate::geometry::{build_ribbon_mesh, RibbonMesh};
use crate::options::GeometryOptions;
use crate::structure::{AtomInstance, AtomRecord, Bounds, ParsedStructure};

/// The displayed structure plus bookkeeping for derived geometry.
#[derive(Debug, Default)]
pub struct Scene {
    structure: ParsedStructure,
    source_name: Option<String>,
    generation: u64,
    ribbon_stale: bool,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed structure. The previous one is dropped only
    /// after the new one is in place.
    pub fn replace(&mut self, name: impl Into<String>, structure: ParsedStructure) {
        self.structure = structure;
        self.source_name = Some(name.into());
        self.generation += 1;
        self.ribbon_stale = true;
    }

    /// Current structure (empty before the first load).
    #[must_use]
    pub fn structure(&self) -> &ParsedStructure {
        &self.structure
    }

    /// Name of the loaded source, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Incremented on every [`Scene::replace`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bounds of all atoms.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.structure.bounds()
    }

    /// Packed per-atom instance records.
    #[must_use]
    pub fn instances(&self) -> &[AtomInstance] {
        &self.structure.instances
    }

    /// Atom record by index.
    #[must_use]
    pub fn atom(&self, index: usize) -> Option<&AtomRecord> {
        self.structure.atoms.get(index)
    }

    /// Force the next [`Scene::take_ribbon_rebuild`] to regenerate.
    pub fn mark_ribbon_stale(&mut self) {
        self.ribbon_stale = true;
    }

    /// Rebuild the ribbon if the backbone changed since the last call.
    pub fn take_ribbon_rebuild(&mut self, options: &GeometryOptions) -> Option<RibbonMesh> {
        if !self.ribbon_stale {
            return None;
        }
        self.ribbon_stale = false;
        Some(build_ribbon_mesh(&self.structure.backbone, options))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::structure::{BackboneAtom, SecondaryStructure};

    fn structure_with_backbone(n: usize) -> ParsedStructure {
        ParsedStructure {
            backbone: (0..n)
                .map(|i| BackboneAtom {
                    position: Vec3::new(i as f32 * 3.8, 0.0, 0.0),
                    residue_index: i as i32,
                    secondary_structure: SecondaryStructure::Coil,
                })
                .collect(),
            ..ParsedStructure::default()
        }
    }

    #[test]
    fn empty_scene() {
        let mut scene = Scene::new();
        assert!(scene.instances().is_empty());
        assert!(scene.bounds().is_none());
        assert!(scene.source_name().is_none());
        assert!(scene.take_ribbon_rebuild(&GeometryOptions::default()).is_none());
    }

    #[test]
    fn replace_bumps_generation_and_marks_ribbon() {
        let mut scene = Scene::new();
        scene.replace("a.pdb", structure_with_backbone(6));
        assert_eq!(scene.generation(), 1);
        assert_eq!(scene.source_name(), Some("a.pdb"));

        let opts = GeometryOptions::default();
        let mesh = scene.take_ribbon_rebuild(&opts).unwrap();
        assert!(!mesh.is_empty());
        assert!(scene.take_ribbon_rebuild(&opts).is_none());

        scene.mark_ribbon_stale();
        assert!(scene.take_ribbon_rebuild(&opts).is_some());
    }

    #[test]
    fn short_backbone_rebuilds_to_empty_mesh() {
        let mut scene = Scene::new();
        scene.replace("short.pdb", structure_with_backbone(2));
        let mesh = scene.take_ribbon_rebuild(&GeometryOptions::default()).unwrap();
        assert!(mesh.is_empty());
    }
}
