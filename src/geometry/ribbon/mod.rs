//! Ribbon extrusion along the α-carbon trace.
//!
//! Each backbone segment (between consecutive α-carbons) is sampled on a
//! Catmull-Rom spline and swept with a cross-section chosen by the
//! segment's secondary-structure class:
//!
//! - helix: twisted, rising circular tube
//! - sheet: flat strip that widens toward the end of the segment
//! - coil: plain circular tube
//!
//! Segments are emitted as independent strips. The mesh is always rebuilt
//! from scratch.

mod spline;

use glam::Vec3;

use crate::options::GeometryOptions;
use crate::structure::{BackboneAtom, SecondaryStructure};
use spline::{
    catmull_rom_point, catmull_rom_tangent, frame_at, pad_endpoints, twist,
    SplinePoint,
};

/// Minimum number of backbone atoms needed for extrusion.
pub const MIN_BACKBONE_ATOMS: usize = 4;

/// Ribbon triangle mesh with per-vertex attributes in parallel arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonMesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGB from the secondary-structure palette.
    pub colors: Vec<[f32; 3]>,
    /// Triangle list.
    pub indices: Vec<u32>,
}

impl RibbonMesh {
    /// `true` when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn push_vertex(&mut self, pos: Vec3, normal: Vec3, color: [f32; 3]) {
        self.positions.push(pos.to_array());
        self.normals.push(normal.to_array());
        self.colors.push(color);
    }

    fn next_index(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Build the ribbon for an ordered backbone.
///
/// Fewer than [`MIN_BACKBONE_ATOMS`] entries yields an empty mesh.
#[must_use]
pub fn build_ribbon_mesh(
    backbone: &[BackboneAtom],
    options: &GeometryOptions,
) -> RibbonMesh {
    let mut mesh = RibbonMesh::default();
    if backbone.len() < MIN_BACKBONE_ATOMS {
        return mesh;
    }

    let points: Vec<Vec3> = backbone.iter().map(|b| b.position).collect();
    let padded = pad_endpoints(&points);
    let radial = options.radial_segments.max(3);

    for (i, atom) in backbone.iter().enumerate().take(backbone.len() - 1) {
        let control = [padded[i], padded[i + 1], padded[i + 2], padded[i + 3]];
        let class = atom.secondary_structure;
        let subdivisions = options.subdivisions_for(class);
        let color = class.color();

        let samples: Vec<(f32, SplinePoint)> = (0..=subdivisions)
            .map(|s| {
                let t = s as f32 / subdivisions as f32;
                let frame = frame_at(
                    catmull_rom_point(control, t),
                    catmull_rom_tangent(control, t),
                );
                (t, frame)
            })
            .collect();

        match class {
            SecondaryStructure::Helix => {
                let rings = samples.iter().map(|&(t, frame)| {
                    let angle = (i as f32 + t) * options.helix_twist;
                    let mut frame = twist(frame, angle);
                    frame.pos += frame.up * options.helix_rise * angle.sin();
                    frame
                });
                extrude_tube(&mut mesh, rings, options.helix_radius, radial, color);
            }
            SecondaryStructure::Coil => {
                let rings = samples.iter().map(|&(_, frame)| frame);
                extrude_tube(&mut mesh, rings, options.coil_radius, radial, color);
            }
            SecondaryStructure::Sheet => {
                extrude_sheet(&mut mesh, &samples, options, color);
            }
        }
    }

    log::debug!(
        "ribbon mesh: {} vertices, {} triangles from {} residues",
        mesh.vertex_count(),
        mesh.index_count() / 3,
        backbone.len(),
    );
    mesh
}

/// Sweep a circle of `radial` vertices along the frames, connecting each
/// ring to the next with wrap-around.
fn extrude_tube(
    mesh: &mut RibbonMesh,
    frames: impl Iterator<Item = SplinePoint>,
    radius: f32,
    radial: u32,
    color: [f32; 3],
) {
    let base = mesh.next_index();
    let mut ring_count = 0u32;
    for frame in frames {
        for k in 0..radial {
            let angle = k as f32 / radial as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let normal = frame.right * cos + frame.up * sin;
            mesh.push_vertex(frame.pos + normal * radius, normal, color);
        }
        ring_count += 1;
    }

    for ring in 0..ring_count.saturating_sub(1) {
        let row = base + ring * radial;
        for k in 0..radial {
            let a = row + k;
            let b = row + (k + 1) % radial;
            let c = a + radial;
            let d = b + radial;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
}

/// Flat two-vertex cross-sections joined as a triangle strip.
fn extrude_sheet(
    mesh: &mut RibbonMesh,
    samples: &[(f32, SplinePoint)],
    options: &GeometryOptions,
    color: [f32; 3],
) {
    let base = mesh.next_index();
    for &(t, frame) in samples {
        let half_width =
            options.sheet_width * 0.5 * (1.0 + options.sheet_arrow_growth * t);
        let offset = frame.right * half_width;
        mesh.push_vertex(frame.pos - offset, frame.up, color);
        mesh.push_vertex(frame.pos + offset, frame.up, color);
    }

    for s in 0..samples.len().saturating_sub(1) as u32 {
        let left = base + 2 * s;
        let right = left + 1;
        let next_left = left + 2;
        let next_right = left + 3;
        mesh.indices
            .extend_from_slice(&[left, right, next_left, right, next_right, next_left]);
    }
}
