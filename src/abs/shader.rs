//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::abs::Gl;
use crate::error::{Error, GlError};

/// Pipeline stage a [`Shader`] is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = glow::VERTEX_SHADER as isize,
    Fragment = glow::FRAGMENT_SHADER as isize,
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<dyn Gl>,
    id: glow::Shader,
    stage: ShaderStage,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<dyn Gl>, stage: ShaderStage, source: &str) -> Result<Self, GlError> {
        let id = gl.create_shader(stage as u32).map_err(|reason| GlError::Create {
            object: "shader",
            reason,
        })?;

        if let Err(log) = gl.compile_shader(id, source) {
            log::error!("{:?} shader failed to compile: {}", stage, log);
            gl.delete_shader(id);
            return Err(GlError::Compile(log));
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            stage,
        })
    }

    /// Reads and compiles the shader source at `path`.
    pub fn from_file(gl: &Arc<dyn Gl>, stage: ShaderStage, path: &Path) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: PathBuf::from(path),
            source,
        })?;
        log::debug!("Compiling {:?} shader {}", stage, path.display());
        Ok(Self::new(gl, stage, &source)?)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable at `location`.
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation);
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_i32(location, *self as i32);
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_i32(location, *self);
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_f32(location, &[*self]);
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_f32(location, &self.to_array());
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_f32(location, &self.to_array());
    }
}

impl Uniform for Vec4 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_f32(location, &self.to_array());
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        gl.uniform_mat4(location, &self.to_cols_array());
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &dyn Gl, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<dyn Gl>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<dyn Gl>, shaders: &[&Shader]) -> Result<Self, GlError> {
        let program = gl.create_program().map_err(|reason| GlError::Create {
            object: "program",
            reason,
        })?;

        let ids: Vec<glow::Shader> = shaders.iter().map(|shader| shader.id).collect();
        if let Err(log) = gl.link_program(program, &ids) {
            log::error!("Shader program failed to link: {}", log);
            gl.delete_program(program);
            return Err(GlError::Link(log));
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: program,
        })
    }

    /// Compiles a vertex and a fragment shader from disk and links them.
    pub fn from_files(
        gl: &Arc<dyn Gl>,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, Error> {
        let vert = Shader::from_file(gl, ShaderStage::Vertex, vertex_path)?;
        let frag = Shader::from_file(gl, ShaderStage::Fragment, fragment_path)?;
        Ok(Self::new(gl, &[&vert, &frag])?)
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Sets a uniform variable in the shader program. Unknown names are ignored.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        match self.gl.uniform_location(self.id, name) {
            Some(location) => value.set_uniform(self.gl.as_ref(), &location),
            None => log::trace!("Uniform {} not found in program", name),
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
