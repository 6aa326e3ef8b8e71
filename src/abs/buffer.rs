//! Owning wrappers around OpenGL buffer objects.
//!
//! [`Buffer`] owns exactly one buffer handle and deletes it when dropped. [`Vbo`] and [`Ebo`]
//! fix the binding target to `ARRAY_BUFFER` and `ELEMENT_ARRAY_BUFFER` respectively.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::abs::Gl;
use crate::error::GlError;

/// The binding point a [`Buffer`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array = glow::ARRAY_BUFFER as isize,
    /// Vertex indices.
    ElementArray = glow::ELEMENT_ARRAY_BUFFER as isize,
}

/// Hint to the driver about how often the buffer contents will change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw = glow::STATIC_DRAW as isize,
    DynamicDraw = glow::DYNAMIC_DRAW as isize,
    StreamDraw = glow::STREAM_DRAW as isize,
}

/// A GPU buffer object.
pub struct Buffer {
    gl: Arc<dyn Gl>,
    target: BufferTarget,
    handle: Option<glow::Buffer>,
}

impl Buffer {
    /// Creates a new buffer object for the given binding target.
    pub fn new(gl: &Arc<dyn Gl>, target: BufferTarget) -> Result<Self, GlError> {
        let handle = gl.create_buffer().map_err(|reason| {
            log::error!("Failed to create {:?} buffer: {}", target, reason);
            GlError::Create { object: "buffer", reason }
        })?;

        Ok(Self {
            gl: Arc::clone(gl),
            target,
            handle: Some(handle),
        })
    }

    /// Makes this buffer the active one for its target.
    pub fn bind(&self) {
        if self.handle.is_none() {
            log::warn!("Binding a released {:?} buffer", self.target);
        }
        self.gl.bind_buffer(self.target as u32, self.handle);
    }

    /// Binds the null buffer to this buffer's target.
    pub fn unbind(&self) {
        self.gl.bind_buffer(self.target as u32, None);
    }

    /// Binds the buffer and replaces its contents with `data`.
    ///
    /// The number of bytes uploaded is always `size_of_val(data)`.
    pub fn assign_data<T: bytemuck::Pod>(&self, data: &[T], usage: BufferUsage) {
        self.bind();
        self.gl
            .buffer_data(self.target as u32, bytemuck::cast_slice(data), usage as u32);
    }

    /// The driver handle, or `None` once released.
    pub fn handle(&self) -> Option<glow::Buffer> {
        self.handle
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Deletes the buffer now. Later calls, including the one from `Drop`, do nothing.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_buffer(handle);
        }
    }

    /// Gives up ownership of the handle without deleting it.
    pub fn into_raw(mut self) -> Option<glow::Buffer> {
        self.handle.take()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("target", &self.target)
            .field("handle", &self.handle)
            .finish()
    }
}

/// A buffer bound to `ARRAY_BUFFER`, holding vertex data.
#[derive(Debug)]
pub struct Vbo(Buffer);

impl Vbo {
    pub fn new(gl: &Arc<dyn Gl>) -> Result<Self, GlError> {
        Buffer::new(gl, BufferTarget::Array).map(Self)
    }

    /// Creates the buffer and uploads `data` in one go.
    pub fn with_data<T: bytemuck::Pod>(
        gl: &Arc<dyn Gl>,
        data: &[T],
        usage: BufferUsage,
    ) -> Result<Self, GlError> {
        let vbo = Self::new(gl)?;
        vbo.assign_data(data, usage);
        Ok(vbo)
    }
}

impl Deref for Vbo {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.0
    }
}

impl DerefMut for Vbo {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.0
    }
}

/// A buffer bound to `ELEMENT_ARRAY_BUFFER`, holding indices.
#[derive(Debug)]
pub struct Ebo(Buffer);

impl Ebo {
    pub fn new(gl: &Arc<dyn Gl>) -> Result<Self, GlError> {
        Buffer::new(gl, BufferTarget::ElementArray).map(Self)
    }

    /// Creates the buffer and uploads `indices` in one go.
    pub fn with_indices(
        gl: &Arc<dyn Gl>,
        indices: &[u32],
        usage: BufferUsage,
    ) -> Result<Self, GlError> {
        let ebo = Self::new(gl)?;
        ebo.assign_data(indices, usage);
        Ok(ebo)
    }
}

impl Deref for Ebo {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.0
    }
}

impl DerefMut for Ebo {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.0
    }
}
