//! Typed molecular structure data parsed from PDB coordinate files.
//!
//! The parser produces three parallel views of one structure:
//!
//! - [`AtomRecord`]s in file order, each carrying its sequence `index`
//! - a packed [`AtomInstance`] buffer (7 floats per atom) that is uploaded
//!   to the GPU instance buffer without further transformation
//! - the α-carbon [`BackboneAtom`] trace used for ribbon extrusion
//!
//! Downstream consumers refer to atoms by `index` and never copy records.

pub mod element;
pub mod parser;
pub mod secondary_structure;

use glam::Vec3;

pub use element::{element_style, ElementStyle};
pub use parser::{parse_structure, parse_structure_str, StructureError};
pub use secondary_structure::SecondaryStructure;

/// Number of `f32` values in one packed atom instance record.
pub const INSTANCE_STRIDE: usize = 7;

/// One accepted `ATOM`/`HETATM` line.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Position in file order, assigned at parse time.
    pub index: usize,
    /// Cartesian coordinates in file units (Å).
    pub position: Vec3,
    /// Chemical element symbol, upper-case (e.g. `"C"`, `"FE"`).
    pub element: String,
    /// Three-letter residue name.
    pub residue_name: String,
    /// Residue sequence number.
    pub residue_number: i32,
    /// Chain identifier (may be empty).
    pub chain_id: String,
    /// Atom name with surrounding whitespace removed (e.g. `"CA"`).
    pub atom_name: String,
}

/// Per-atom GPU instance record: position, color, radius.
///
/// Must match the instance vertex layout consumed by the molecule shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AtomInstance {
    /// Atom centre in world space.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Sphere radius in world units.
    pub radius: f32,
}

impl AtomInstance {
    /// Centre as a glam vector.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// α-carbon trace entry, one per residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneAtom {
    /// α-carbon position.
    pub position: Vec3,
    /// Residue sequence number the α-carbon belongs to.
    pub residue_index: i32,
    /// Placeholder secondary-structure class (see [`secondary_structure`]).
    pub secondary_structure: SecondaryStructure,
}

/// Axis-aligned bounds of a set of atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Component-wise minimum.
    pub min: Vec3,
    /// Component-wise maximum.
    pub max: Vec3,
}

impl Bounds {
    /// Bounds of the given points, or `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        Some(Self { min, max })
    }

    /// Centre of the box.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest edge length of the box.
    #[must_use]
    pub fn largest_extent(&self) -> f32 {
        (self.max - self.min).max_element()
    }
}

/// Result of parsing one structure file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStructure {
    /// Atom records in file order; `atoms[i].index == i`.
    pub atoms: Vec<AtomRecord>,
    /// Packed instance records; `instances[i]` describes `atoms[i]`.
    pub instances: Vec<AtomInstance>,
    /// α-carbon trace sorted ascending by residue number.
    pub backbone: Vec<BackboneAtom>,
    /// Number of atom lines rejected as malformed.
    pub skipped_lines: usize,
}

impl ParsedStructure {
    /// Number of parsed atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// `true` when no atom records were accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Instance buffer as a flat float sequence (`7 * atom_count` long).
    #[must_use]
    pub fn instance_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Bounding box of all atom centres.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.atoms.iter().map(|a| a.position))
    }
}
