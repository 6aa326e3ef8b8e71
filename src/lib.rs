//! A small OpenGL rendering scaffold.
//!
//! The [`abs`] module wraps OpenGL buffer objects, vertex array objects, textures, shaders and
//! meshes in owning types that release their GPU handles on drop. All GL access goes through the
//! [`abs::Gl`] trait, implemented for [`glow::Context`].

pub mod abs;
pub mod config;
pub mod error;
pub mod logging;
pub mod vert_data;

pub use error::{Error, GlError, LayoutError, MeshError, TextureError};
