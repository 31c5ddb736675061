//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::renderer::RenderError;
use crate::scene::loader::LoadError;

/// Errors produced by the molscope crate.
#[derive(Debug)]
pub enum MolscopeError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Render pipeline setup failure.
    Render(RenderError),
    /// Failed to load a molecular structure file.
    Load(LoadError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MolscopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
            Self::Load(e) => write!(f, "structure load error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MolscopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<RenderContextError> for MolscopeError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<RenderError> for MolscopeError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<LoadError> for MolscopeError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<std::io::Error> for MolscopeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
