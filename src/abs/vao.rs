//! Vertex array objects.

use std::sync::Arc;

use crate::abs::{Ebo, Gl, Vbo, VertexBufferLayout};
use crate::error::GlError;

/// A vertex array object together with the buffers it references.
///
/// The VAO owns its buffers: dropping it deletes the array and every attached buffer.
pub struct Vao {
    gl: Arc<dyn Gl>,
    id: glow::VertexArray,
    vbos: Vec<Vbo>,
    ebo: Option<Ebo>,
}

impl Vao {
    pub fn new(gl: &Arc<dyn Gl>) -> Result<Self, GlError> {
        let id = gl.create_vertex_array().map_err(|reason| {
            log::error!("Failed to create vertex array: {}", reason);
            GlError::Create { object: "vertex array", reason }
        })?;

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            vbos: Vec::new(),
            ebo: None,
        })
    }

    /// Attaches `vbo` and points every attribute in `layout` at it.
    ///
    /// Attributes must be declared in the order they appear in memory.
    pub fn add_vbo(&mut self, vbo: Vbo, layout: &VertexBufferLayout) {
        self.bind();
        vbo.bind();

        for pointer in layout.attribute_pointers() {
            self.gl.vertex_attrib_pointer(
                pointer.index,
                pointer.element.count as i32,
                pointer.element.gl_type,
                pointer.element.normalised,
                pointer.stride as i32,
                pointer.offset as i32,
            );
            self.gl.enable_vertex_attrib_array(pointer.index);
        }

        self.unbind();
        vbo.unbind();
        self.vbos.push(vbo);
    }

    /// Attaches the index buffer. The binding is recorded in the VAO, so it is bound while the
    /// VAO is and must not be unbound before the VAO is.
    pub fn set_ebo(&mut self, ebo: Ebo) {
        self.bind();
        ebo.bind();
        self.unbind();

        if self.ebo.replace(ebo).is_some() {
            log::debug!("Replaced index buffer of vertex array {:?}", self.id);
        }
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.id));
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(None);
    }

    pub fn vbo_count(&self) -> usize {
        self.vbos.len()
    }

    pub fn has_ebo(&self) -> bool {
        self.ebo.is_some()
    }

    pub fn id(&self) -> glow::VertexArray {
        self.id
    }
}

impl Drop for Vao {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::recording::{Call, RecordingGl};
    use crate::abs::BufferUsage;

    fn setup() -> (Arc<RecordingGl>, Arc<dyn Gl>) {
        let recorder = Arc::new(RecordingGl::new());
        let gl: Arc<dyn Gl> = recorder.clone();
        (recorder, gl)
    }

    fn pointers(recorder: &RecordingGl) -> Vec<(u32, i32, i32, i32)> {
        recorder
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::VertexAttribPointer { index, size, stride, offset, .. } => {
                    Some((index, size, stride, offset))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_position_only_layout() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let vertices = [0.0f32; 9];
        let vbo = Vbo::with_data(&gl, &vertices, BufferUsage::StaticDraw).unwrap();

        let mut layout = VertexBufferLayout::new();
        layout.add_attribute::<f32>(Some(0), 3, false).unwrap();
        vao.add_vbo(vbo, &layout);

        assert_eq!(pointers(&recorder), vec![(0, 3, 12, 0)]);
        assert_eq!(vao.vbo_count(), 1);
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let vbo = Vbo::new(&gl).unwrap();

        let mut layout = VertexBufferLayout::new();
        layout.add_attribute::<f32>(Some(1), 3, false).unwrap();
        layout.add_attribute::<f32>(Some(0), 3, false).unwrap();
        layout.add_attribute::<f32>(Some(2), 2, false).unwrap();
        vao.add_vbo(vbo, &layout);

        assert_eq!(
            pointers(&recorder),
            vec![(0, 3, 32, 0), (1, 3, 32, 12), (2, 2, 32, 24)]
        );
        assert_eq!(
            recorder.count(|call| matches!(call, Call::EnableVertexAttribArray(_))),
            3
        );
    }

    #[test]
    fn test_bool_attribute_is_wired_as_unsigned_byte() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let vbo = Vbo::new(&gl).unwrap();

        let mut layout = VertexBufferLayout::new();
        layout.add_attribute::<f32>(None, 3, false).unwrap();
        layout.add_attribute::<bool>(None, 1, false).unwrap();
        vao.add_vbo(vbo, &layout);

        let types: Vec<u32> = recorder
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::VertexAttribPointer { data_type, .. } => Some(data_type),
                _ => None,
            })
            .collect();
        assert_eq!(types, vec![glow::FLOAT, glow::UNSIGNED_BYTE]);
        assert!(!types.contains(&glow::BOOL));
        assert_eq!(pointers(&recorder)[1], (1, 1, 13, 12));
    }

    #[test]
    fn test_attributes_are_set_while_vao_and_vbo_are_bound() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let vbo = Vbo::new(&gl).unwrap();
        let vao_id = vao.id().0.get();
        let vbo_id = vbo.handle().unwrap().0.get();
        recorder.clear_calls();

        let mut layout = VertexBufferLayout::new();
        layout.add_attribute::<f32>(None, 3, false).unwrap();
        vao.add_vbo(vbo, &layout);

        let calls = recorder.calls();
        assert_eq!(calls[0], Call::BindVertexArray(Some(vao_id)));
        assert_eq!(
            calls[1],
            Call::BindBuffer { target: glow::ARRAY_BUFFER, buffer: Some(vbo_id) }
        );
        assert!(matches!(calls[2], Call::VertexAttribPointer { index: 0, .. }));
    }

    #[test]
    fn test_ebo_is_bound_inside_vao() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let ebo = Ebo::with_indices(&gl, &[0, 1, 2], BufferUsage::StaticDraw).unwrap();
        let vao_id = vao.id().0.get();
        let ebo_id = ebo.handle().unwrap().0.get();
        recorder.clear_calls();

        vao.set_ebo(ebo);

        assert_eq!(
            recorder.calls(),
            vec![
                Call::BindVertexArray(Some(vao_id)),
                Call::BindBuffer { target: glow::ELEMENT_ARRAY_BUFFER, buffer: Some(ebo_id) },
                Call::BindVertexArray(None),
            ]
        );
        assert!(vao.has_ebo());
    }

    #[test]
    fn test_drop_releases_array_and_owned_buffers() {
        let (recorder, gl) = setup();
        let mut vao = Vao::new(&gl).unwrap();
        let layout = {
            let mut layout = VertexBufferLayout::new();
            layout.add_attribute::<f32>(None, 3, false).unwrap();
            layout
        };
        vao.add_vbo(Vbo::new(&gl).unwrap(), &layout);
        vao.add_vbo(Vbo::new(&gl).unwrap(), &layout);
        vao.set_ebo(Ebo::new(&gl).unwrap());
        drop(vao);

        assert_eq!(
            recorder.count(|call| matches!(call, Call::DeleteVertexArray(_))),
            1
        );
        assert_eq!(recorder.count(|call| matches!(call, Call::DeleteBuffer(_))), 3);
    }
}
