//! Procedural, GPU-free mesh generation.
//!
//! Both generators are pure functions of their inputs; the renderer
//! uploads the results wholesale.

pub mod ribbon;
pub mod sphere;

pub use ribbon::{build_ribbon_mesh, RibbonMesh, MIN_BACKBONE_ATOMS};
pub use sphere::{create_sphere_mesh, SphereMesh};
