//! Error types for the rendering wrappers and the application layer.

use std::path::PathBuf;

/// A failure reported by the OpenGL driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlError {
    #[error("failed to create {object}: {reason}")]
    Create { object: &'static str, reason: String },
    #[error("shader compilation failed: {0}")]
    Compile(String),
    #[error("program linking failed: {0}")]
    Link(String),
}

/// A rejected vertex attribute. The layout is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unsupported vertex attribute type {0:#06x}")]
    UnsupportedType(u32),
    #[error("vertex attribute component count must be between 1 and 4, got {0}")]
    InvalidCount(u32),
    #[error("vertex attribute slot {0} is out of range")]
    InvalidIndex(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("invalid file format for texture {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("failed to load texture data from {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Gl(#[from] GlError),
}

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error(transparent)]
    Gl(#[from] GlError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors surfaced by the application layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("window error: {0}")]
    Window(String),
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to set up logging")]
    Logger(#[from] fern::InitError),
    #[error(transparent)]
    Gl(#[from] GlError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
