// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-accelerated molecular structure viewer built on wgpu.
//!
//! Molscope parses PDB coordinate files, draws every atom as an instanced
//! sphere or the protein backbone as a spline-extruded ribbon, and lets
//! the user orbit, pan, zoom and double-click atoms to recentre on them.
//!
//! # Key entry points
//!
//! - [`structure::parse_structure`] - PDB text to typed atom records
//! - [`geometry`] - sphere and ribbon mesh generators (GPU-free)
//! - [`engine::MolecularEngine`] - owns the renderer, loader and view state
//! - [`engine::ViewerState`] - headless interaction model
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! Files are parsed on a background [`scene::loader::StructureLoader`]
//! thread and handed back through a lock-free triple buffer. The frame
//! loop applies finished loads, advances camera animations, rebuilds the
//! ribbon when needed, and issues one draw call for the active mode.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod structure;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use engine::{MolecularEngine, ViewerCommand};
pub use error::MolscopeError;
pub use input::{InputEvent, InputProcessor, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
