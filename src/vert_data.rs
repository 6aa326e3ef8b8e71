//! Built-in geometry for the demo.

use glam::{Vec2, Vec3};

use crate::abs::{Vertex, VertexBufferLayout};
use crate::error::LayoutError;

/// Position (xyz), colour (rgb) and texture coordinates (uv) per vertex.
#[rustfmt::skip]
pub const RECTANGLE_TEXTURED_VERTS: [f32; 32] = [
     0.5,  0.5, 0.0,   1.0, 0.0, 0.0,   1.0, 1.0,
     0.5, -0.5, 0.0,   0.0, 1.0, 0.0,   1.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0,
    -0.5,  0.5, 0.0,   1.0, 1.0, 0.0,   0.0, 1.0,
];

#[rustfmt::skip]
pub const RECTANGLE_INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

/// Position (xyz) and colour (rgb) per vertex.
fn colored_layout() -> Result<VertexBufferLayout, LayoutError> {
    let mut layout = VertexBufferLayout::new();
    layout.add_attribute::<f32>(None, 3, false)?;
    layout.add_attribute::<f32>(None, 3, false)?;
    Ok(layout)
}

/// Layout of [`RECTANGLE_TEXTURED_VERTS`]: position, colour, texture coordinates.
pub fn textured_layout() -> Result<VertexBufferLayout, LayoutError> {
    let mut layout = colored_layout()?;
    layout.add_attribute::<f32>(None, 2, false)?;
    Ok(layout)
}

/// A small triangle facing the camera, for use as a [`Mesh`](crate::abs::Mesh).
pub fn triangle_mesh_data(offset: Vec3, scale: f32) -> (Vec<Vertex>, Vec<u32>) {
    let corners = [
        (Vec3::new(-0.5, -0.5, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(0.5, -0.5, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(0.0, 0.5, 0.0), Vec2::new(0.5, 1.0)),
    ];
    let vertices = corners
        .into_iter()
        .map(|(position, uv)| Vertex::new(position * scale + offset, Vec3::Z, uv))
        .collect();
    (vertices, vec![0, 1, 2])
}
