//! This module contains the core rendering components: the OpenGL seam, buffer objects,
//! vertex layouts, vertex arrays, textures, shaders and meshes.

#[cfg(feature = "window")]
pub mod app;
pub mod buffer;
pub mod gl;
pub mod layout;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod vao;

#[cfg(feature = "window")]
pub use app::*;
pub use buffer::*;
pub use gl::*;
pub use layout::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
pub use vao::*;

#[cfg(test)]
pub(crate) use gl::recording;
