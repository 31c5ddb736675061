//! CPU atom picking: unproject the pointer into a world ray and test it
//! against every atom sphere in the instance buffer.

mod ray;

use glam::Vec3;

pub use ray::Ray;

use crate::structure::AtomInstance;

/// Atom selected by a pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Index into the atom records / instance buffer.
    pub index: usize,
    /// Atom centre in world space.
    pub position: Vec3,
}

/// Pick the atom hit by `ray`.
///
/// Among all intersected spheres the one whose *centre* is nearest to the
/// ray origin wins, which can differ from the nearest surface hit when
/// large and small atoms overlap. Ties keep the lower index.
#[must_use]
pub fn pick_atom(ray: &Ray, instances: &[AtomInstance]) -> Option<PickResult> {
    instances
        .iter()
        .enumerate()
        .filter(|(_, atom)| ray.intersects_sphere(atom.center(), atom.radius))
        .map(|(index, atom)| {
            let position = atom.center();
            (index, position, position.distance_squared(ray.origin))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(index, position, _)| PickResult { index, position })
}
