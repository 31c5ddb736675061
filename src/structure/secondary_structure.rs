//! Secondary-structure classes for ribbon shape and color.
//!
//! **Placeholder classification.** Classes are assigned from the residue
//! name alone: a fixed set of residue names maps to helix, another to
//! sheet, everything else to coil. This is a stand-in, not structural
//! inference. It ignores `HELIX`/`SHEET` annotation records and does no
//! phi/psi or hydrogen-bond analysis. Tests must not assume the result
//! matches the real fold of a protein.

/// Coarse secondary-structure class of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryStructure {
    /// α-helix: dense sampling, twisted tube.
    Helix,
    /// β-strand: coarse sampling, flat widening ribbon.
    Sheet,
    /// Anything else: medium sampling, plain tube.
    #[default]
    Coil,
}

/// Residue names treated as helix formers.
const HELIX_RESIDUES: &[&str] = &["ALA", "LEU", "GLU", "MET", "GLN", "LYS", "ARG"];

/// Residue names treated as sheet formers.
const SHEET_RESIDUES: &[&str] = &["VAL", "ILE", "TYR", "PHE", "TRP", "THR"];

impl SecondaryStructure {
    /// Classify a residue by name.
    #[must_use]
    pub fn from_residue_name(name: &str) -> Self {
        let name = name.trim();
        if HELIX_RESIDUES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
            Self::Helix
        } else if SHEET_RESIDUES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
            Self::Sheet
        } else {
            Self::Coil
        }
    }

    /// Ribbon color for this class (RGB, 0-1 range).
    #[must_use]
    pub fn color(self) -> [f32; 3] {
        match self {
            Self::Helix => [0.9, 0.3, 0.5],
            Self::Sheet => [0.95, 0.85, 0.3],
            Self::Coil => [0.6, 0.85, 0.6],
        }
    }
}
