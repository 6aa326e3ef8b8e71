//! Vertex buffer layouts.
//!
//! A [`VertexBufferLayout`] maps attribute slots to the [`VertexBufferElement`] that describes
//! the data found there. Elements are laid out in memory in slot order, so the byte offset of a
//! slot is the sum of the sizes of every lower slot.

use std::collections::BTreeMap;

use crate::error::LayoutError;

/// Number of attribute slots every OpenGL 3.3 implementation provides (`GL_MAX_VERTEX_ATTRIBS`).
pub const MAX_ATTRIBUTES: u32 = 16;

/// A Rust type that can be used as a vertex attribute component.
pub trait AttributeType {
    /// The OpenGL enum naming the type.
    const GL_TYPE: u32;
    /// Size of one component in bytes.
    const SIZE: u32;
}

impl AttributeType for f32 {
    const GL_TYPE: u32 = glow::FLOAT;
    const SIZE: u32 = size_of::<f32>() as u32;
}

impl AttributeType for i32 {
    const GL_TYPE: u32 = glow::INT;
    const SIZE: u32 = size_of::<i32>() as u32;
}

impl AttributeType for u32 {
    const GL_TYPE: u32 = glow::UNSIGNED_INT;
    const SIZE: u32 = size_of::<u32>() as u32;
}

impl AttributeType for u8 {
    const GL_TYPE: u32 = glow::UNSIGNED_BYTE;
    const SIZE: u32 = size_of::<u8>() as u32;
}

/// Uploaded as one unsigned byte per component; `GL_BOOL` is not a valid attribute type.
impl AttributeType for bool {
    const GL_TYPE: u32 = glow::UNSIGNED_BYTE;
    const SIZE: u32 = size_of::<bool>() as u32;
}

/// Returns the component size of a supported OpenGL type enum.
pub fn gl_type_size(gl_type: u32) -> Option<u32> {
    match gl_type {
        glow::FLOAT => Some(f32::SIZE),
        glow::INT => Some(i32::SIZE),
        glow::UNSIGNED_INT => Some(u32::SIZE),
        glow::UNSIGNED_BYTE => Some(u8::SIZE),
        _ => None,
    }
}

/// One attribute of a vertex: `count` contiguous values of `gl_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferElement {
    pub gl_type: u32,
    pub count: u32,
    /// `count * size_of(gl_type)`.
    pub total_size: u32,
    pub normalised: bool,
}

/// Everything needed for a single `glVertexAttribPointer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePointer {
    pub index: u32,
    pub element: VertexBufferElement,
    pub stride: u32,
    pub offset: u32,
}

/// Describes how the vertices in a buffer are structured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: BTreeMap<u32, VertexBufferElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` components of `T` to the layout.
    ///
    /// When `index` is `None` the attribute goes to the slot after the highest one in use.
    /// An explicit index that is already taken replaces the previous element.
    pub fn add_attribute<T: AttributeType>(
        &mut self,
        index: Option<u32>,
        count: u32,
        normalised: bool,
    ) -> Result<(), LayoutError> {
        self.insert(index, T::GL_TYPE, T::SIZE, count, normalised)
    }

    /// Like [`add_attribute`](Self::add_attribute), but with the component type given as an
    /// OpenGL enum. Unsupported enums leave the layout untouched.
    pub fn add_raw_attribute(
        &mut self,
        index: Option<u32>,
        gl_type: u32,
        count: u32,
        normalised: bool,
    ) -> Result<(), LayoutError> {
        let Some(size) = gl_type_size(gl_type) else {
            log::error!("Unsupported vertex attribute type {:#06x}", gl_type);
            return Err(LayoutError::UnsupportedType(gl_type));
        };
        self.insert(index, gl_type, size, count, normalised)
    }

    fn insert(
        &mut self,
        index: Option<u32>,
        gl_type: u32,
        size: u32,
        count: u32,
        normalised: bool,
    ) -> Result<(), LayoutError> {
        if !(1..=4).contains(&count) {
            log::error!("Vertex attribute component count must be 1..=4, got {}", count);
            return Err(LayoutError::InvalidCount(count));
        }

        let index = match index {
            Some(index) => index,
            None => self.next_index().ok_or(LayoutError::InvalidIndex(u32::MAX))?,
        };
        if index >= MAX_ATTRIBUTES {
            log::error!(
                "Vertex attribute slot must be below {}, got {}",
                MAX_ATTRIBUTES,
                index
            );
            return Err(LayoutError::InvalidIndex(index));
        }

        let element = VertexBufferElement {
            gl_type,
            count,
            total_size: count * size,
            normalised,
        };

        if let Some(previous) = self.elements.insert(index, element) {
            log::debug!("Replacing vertex attribute in slot {}", index);
            self.stride -= previous.total_size;
        }
        self.stride += element.total_size;

        Ok(())
    }

    fn next_index(&self) -> Option<u32> {
        match self.elements.last_key_value() {
            Some((index, _)) => index.checked_add(1),
            None => Some(0),
        }
    }

    /// Total size of one vertex in bytes.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The elements in slot order.
    pub fn elements(&self) -> Vec<VertexBufferElement> {
        self.elements.values().copied().collect()
    }

    /// The slot to element mapping.
    pub fn map(&self) -> &BTreeMap<u32, VertexBufferElement> {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Byte offset of `index` within a vertex, if the slot is in use.
    pub fn offset_of(&self, index: u32) -> Option<u32> {
        self.attribute_pointers()
            .into_iter()
            .find(|pointer| pointer.index == index)
            .map(|pointer| pointer.offset)
    }

    /// One pointer per slot, with offsets accumulated in slot order.
    pub fn attribute_pointers(&self) -> Vec<AttributePointer> {
        let mut offset = 0;
        self.elements
            .iter()
            .map(|(&index, &element)| {
                let pointer = AttributePointer {
                    index,
                    element,
                    stride: self.stride,
                    offset,
                };
                offset += element.total_size;
                pointer
            })
            .collect()
    }
}
