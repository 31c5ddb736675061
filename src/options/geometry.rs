use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Tessellation and shape parameters for atom spheres and backbone ribbons.
pub struct GeometryOptions {
    /// Latitude/longitude band count of the shared unit sphere.
    pub sphere_segments: u32,
    /// Spline samples per residue inside helices.
    pub helix_subdivisions: u32,
    /// Spline samples per residue inside sheets.
    pub sheet_subdivisions: u32,
    /// Spline samples per residue inside coils.
    pub coil_subdivisions: u32,
    /// Vertices around each tube cross-section.
    pub radial_segments: u32,
    /// Coil tube radius in angstroms.
    pub coil_radius: f32,
    /// Helix tube radius in angstroms.
    pub helix_radius: f32,
    /// Frame rotation per residue inside helices (radians).
    pub helix_twist: f32,
    /// Amplitude of the vertical helix offset in angstroms.
    pub helix_rise: f32,
    /// Sheet ribbon width in angstroms.
    pub sheet_width: f32,
    /// Fractional widening across one sheet segment (arrowhead hint).
    pub sheet_arrow_growth: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            sphere_segments: 16,
            helix_subdivisions: 12,
            sheet_subdivisions: 4,
            coil_subdivisions: 8,
            radial_segments: 8,
            coil_radius: 0.3,
            helix_radius: 0.45,
            helix_twist: std::f32::consts::FRAC_PI_2,
            helix_rise: 0.4,
            sheet_width: 1.6,
            sheet_arrow_growth: 0.25,
        }
    }
}

impl GeometryOptions {
    /// Subdivisions used for a segment of the given class (at least one).
    #[must_use]
    pub fn subdivisions_for(
        &self,
        class: crate::structure::SecondaryStructure,
    ) -> u32 {
        use crate::structure::SecondaryStructure;
        let n = match class {
            SecondaryStructure::Helix => self.helix_subdivisions,
            SecondaryStructure::Sheet => self.sheet_subdivisions,
            SecondaryStructure::Coil => self.coil_subdivisions,
        };
        n.max(1)
    }
}
