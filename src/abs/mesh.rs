//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct, one drawable unit made of a vertex buffer, an index
//! buffer and the textures sampled while drawing it.

use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::abs::{BufferUsage, Ebo, Gl, ShaderProgram, Texture, Vao, Vbo, VertexBufferLayout};
use crate::error::MeshError;

/// A vertex as stored in a mesh's vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}

/// What a mesh texture is sampled for. Decides the sampler uniform name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
        }
    }
}

/// A texture used by a mesh. Textures are commonly shared between meshes.
#[derive(Clone)]
pub struct MeshTexture {
    pub texture: Rc<Texture>,
    pub kind: TextureKind,
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<dyn Gl>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<MeshTexture>,
    vao: Vao,
}

impl Mesh {
    /// Creates a new mesh and uploads its vertex and index data.
    pub fn new(
        gl: &Arc<dyn Gl>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<MeshTexture>,
    ) -> Result<Self, MeshError> {
        let vao = Self::setup_mesh(gl, &vertices, &indices)?;
        log::debug!(
            "Created mesh with {} vertices, {} indices and {} textures",
            vertices.len(),
            indices.len(),
            textures.len()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            vertices,
            indices,
            textures,
            vao,
        })
    }

    fn setup_mesh(gl: &Arc<dyn Gl>, vertices: &[Vertex], indices: &[u32]) -> Result<Vao, MeshError> {
        let mut vao = Vao::new(gl)?;
        let vbo = Vbo::with_data(gl, vertices, BufferUsage::StaticDraw)?;
        let ebo = Ebo::with_indices(gl, indices, BufferUsage::StaticDraw)?;

        vao.add_vbo(vbo, &Self::layout()?);
        vao.set_ebo(ebo);
        Ok(vao)
    }

    /// The layout of [`Vertex`]: position, normal and texture coordinates in slots 0, 1 and 2.
    pub fn layout() -> Result<VertexBufferLayout, MeshError> {
        let mut layout = VertexBufferLayout::new();
        layout.add_attribute::<f32>(Some(0), 3, false)?;
        layout.add_attribute::<f32>(Some(1), 3, false)?;
        layout.add_attribute::<f32>(Some(2), 2, false)?;
        Ok(layout)
    }

    /// Draws the mesh with `shader`.
    ///
    /// Texture `i` is bound to unit `i`, and its sampler is named after its kind and its rank
    /// among textures of that kind, e.g. `texture_diffuse1`, `texture_specular1`.
    pub fn draw(&self, shader: &ShaderProgram) {
        shader.use_program();

        let mut diffuse = 0;
        let mut specular = 0;
        for (unit, mesh_texture) in self.textures.iter().enumerate() {
            let number = match mesh_texture.kind {
                TextureKind::Diffuse => {
                    diffuse += 1;
                    diffuse
                }
                TextureKind::Specular => {
                    specular += 1;
                    specular
                }
            };
            mesh_texture.texture.bind_to_unit(unit as u32);
            shader.set_uniform(
                &format!("{}{}", mesh_texture.kind.uniform_prefix(), number),
                unit as i32,
            );
        }

        self.vao.bind();
        self.gl.draw_elements(
            glow::TRIANGLES,
            self.indices.len() as i32,
            glow::UNSIGNED_INT,
            0,
        );
        self.vao.unbind();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[MeshTexture] {
        &self.textures
    }

    // Returns the amount of of indices used in the mesh
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::recording::{Call, RecordingGl};
    use crate::abs::{PixelFormat, Shader, ShaderStage, TextureParam};
    use image::{DynamicImage, RgbImage};

    fn setup() -> (Arc<RecordingGl>, Arc<dyn Gl>) {
        let recorder = Arc::new(RecordingGl::new());
        let gl: Arc<dyn Gl> = recorder.clone();
        (recorder, gl)
    }

    fn triangle() -> (Vec<Vertex>, Vec<u32>) {
        let normal = Vec3::Z;
        let vertices = vec![
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), normal, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), normal, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(0.0, 0.5, 0.0), normal, Vec2::new(0.5, 1.0)),
        ];
        (vertices, vec![0, 1, 2])
    }

    fn program(gl: &Arc<dyn Gl>) -> ShaderProgram {
        let vert = Shader::new(gl, ShaderStage::Vertex, "void main() {}").unwrap();
        let frag = Shader::new(gl, ShaderStage::Fragment, "void main() {}").unwrap();
        ShaderProgram::new(gl, &[&vert, &frag]).unwrap()
    }

    fn texture(gl: &Arc<dyn Gl>) -> Rc<Texture> {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        Rc::new(
            Texture::from_image(
                gl,
                glow::TEXTURE_2D,
                &TextureParam::repeat_linear_mipmap(),
                &image,
                PixelFormat::Rgb,
                0,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_layout_matches_vertex_size() {
        let layout = Mesh::layout().unwrap();
        assert_eq!(layout.stride() as usize, size_of::<Vertex>());
        assert_eq!(layout.offset_of(1), Some(12));
        assert_eq!(layout.offset_of(2), Some(24));
    }

    #[test]
    fn test_setup_uploads_vertices_and_indices() {
        let (recorder, gl) = setup();
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&gl, vertices, indices, Vec::new()).unwrap();

        let calls = recorder.calls();
        assert!(calls.contains(&Call::BufferData {
            target: glow::ARRAY_BUFFER,
            len: 3 * size_of::<Vertex>(),
            usage: glow::STATIC_DRAW,
        }));
        assert!(calls.contains(&Call::BufferData {
            target: glow::ELEMENT_ARRAY_BUFFER,
            len: 3 * size_of::<u32>(),
            usage: glow::STATIC_DRAW,
        }));
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_draw_issues_indexed_call() {
        let (recorder, gl) = setup();
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&gl, vertices, indices, Vec::new()).unwrap();
        let shader = program(&gl);
        recorder.clear_calls();

        mesh.draw(&shader);

        assert!(recorder.calls().contains(&Call::DrawElements {
            mode: glow::TRIANGLES,
            count: 3,
            element_type: glow::UNSIGNED_INT,
            offset: 0,
        }));
    }

    #[test]
    fn test_draw_binds_textures_to_numbered_samplers() {
        let (recorder, gl) = setup();
        let (vertices, indices) = triangle();
        let diffuse = texture(&gl);
        let textures = vec![
            MeshTexture { texture: Rc::clone(&diffuse), kind: TextureKind::Diffuse },
            MeshTexture { texture: texture(&gl), kind: TextureKind::Specular },
            MeshTexture { texture: diffuse, kind: TextureKind::Diffuse },
        ];
        let mesh = Mesh::new(&gl, vertices, indices, textures).unwrap();
        let shader = program(&gl);
        recorder.clear_calls();

        mesh.draw(&shader);

        let calls = recorder.calls();
        for (name, unit) in [
            ("texture_diffuse1", 0),
            ("texture_specular1", 1),
            ("texture_diffuse2", 2),
        ] {
            assert!(calls.contains(&Call::UniformI32 { name: name.into(), value: unit }));
            assert!(calls.contains(&Call::ActiveTexture(glow::TEXTURE0 + unit as u32)));
        }
    }

    #[test]
    fn test_dropping_mesh_releases_gpu_resources() {
        let (recorder, gl) = setup();
        let (vertices, indices) = triangle();
        drop(Mesh::new(&gl, vertices, indices, Vec::new()).unwrap());

        assert_eq!(recorder.count(|call| matches!(call, Call::DeleteVertexArray(_))), 1);
        assert_eq!(recorder.count(|call| matches!(call, Call::DeleteBuffer(_))), 2);
    }
}
