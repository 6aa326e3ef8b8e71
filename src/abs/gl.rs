//! The OpenGL entry points used by the wrappers in this crate.
//!
//! Every wrapper holds an `Arc<dyn Gl>` rather than a concrete [`glow::Context`], so the
//! ownership and binding logic can be exercised without a live context. The only production
//! implementation is the one for [`glow::Context`] below.

use glow::HasContext;

/// The subset of OpenGL the crate talks to.
///
/// All methods assume that the context they belong to is current on the calling thread.
pub trait Gl {
    fn create_buffer(&self) -> Result<glow::Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<glow::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: glow::Buffer);

    fn create_vertex_array(&self) -> Result<glow::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<glow::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: glow::VertexArray);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);

    fn create_texture(&self) -> Result<glow::Texture, String>;
    fn bind_texture(&self, target: u32, texture: Option<glow::Texture>);
    fn active_texture(&self, unit: u32);
    fn tex_parameter(&self, target: u32, name: u32, value: i32);
    /// Uploads level 0 of a 2D image. `format` is used for both the internal and pixel format.
    fn tex_image_2d(&self, target: u32, width: i32, height: i32, format: u32, pixels: &[u8]);
    fn generate_mipmap(&self, target: u32);
    fn delete_texture(&self, texture: glow::Texture);

    fn create_shader(&self, stage: u32) -> Result<glow::Shader, String>;
    /// Sets the source of `shader` and compiles it, returning the info log on failure.
    fn compile_shader(&self, shader: glow::Shader, source: &str) -> Result<(), String>;
    fn delete_shader(&self, shader: glow::Shader);
    fn create_program(&self) -> Result<glow::Program, String>;
    /// Attaches `shaders`, links, then detaches them again. Returns the info log on failure.
    fn link_program(&self, program: glow::Program, shaders: &[glow::Shader]) -> Result<(), String>;
    fn delete_program(&self, program: glow::Program);
    fn use_program(&self, program: Option<glow::Program>);
    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation>;
    fn uniform_i32(&self, location: &glow::UniformLocation, value: i32);
    /// Sets a `float`, `vec2`, `vec3` or `vec4` uniform depending on `values.len()`.
    fn uniform_f32(&self, location: &glow::UniformLocation, values: &[f32]);
    fn uniform_mat4(&self, location: &glow::UniformLocation, columns: &[f32; 16]);

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
}

impl Gl for glow::Context {
    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<glow::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<glow::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<glow::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: glow::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe { self.vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn create_texture(&self) -> Result<glow::Texture, String> {
        unsafe { HasContext::create_texture(self) }
    }

    fn bind_texture(&self, target: u32, texture: Option<glow::Texture>) {
        unsafe { HasContext::bind_texture(self, target, texture) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    fn tex_parameter(&self, target: u32, name: u32, value: i32) {
        unsafe { self.tex_parameter_i32(target, name, value) }
    }

    fn tex_image_2d(&self, target: u32, width: i32, height: i32, format: u32, pixels: &[u8]) {
        unsafe {
            // Rows of 3-channel images are not 4-byte aligned in general.
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            HasContext::tex_image_2d(
                self,
                target,
                0,
                format as i32,
                width,
                height,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { HasContext::generate_mipmap(self, target) }
    }

    fn delete_texture(&self, texture: glow::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn create_shader(&self, stage: u32) -> Result<glow::Shader, String> {
        unsafe { HasContext::create_shader(self, stage) }
    }

    fn compile_shader(&self, shader: glow::Shader, source: &str) -> Result<(), String> {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            if self.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn link_program(&self, program: glow::Program, shaders: &[glow::Shader]) -> Result<(), String> {
        unsafe {
            for shader in shaders {
                self.attach_shader(program, *shader);
            }

            HasContext::link_program(self, program);
            let linked = self.get_program_link_status(program);

            for shader in shaders {
                self.detach_shader(program, *shader);
            }

            if linked {
                Ok(())
            } else {
                Err(self.get_program_info_log(program))
            }
        }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_i32(&self, location: &glow::UniformLocation, value: i32) {
        unsafe { self.uniform_1_i32(Some(location), value) }
    }

    fn uniform_f32(&self, location: &glow::UniformLocation, values: &[f32]) {
        unsafe {
            match *values {
                [x] => self.uniform_1_f32(Some(location), x),
                [x, y] => self.uniform_2_f32(Some(location), x, y),
                [x, y, z] => self.uniform_3_f32(Some(location), x, y, z),
                [x, y, z, w] => self.uniform_4_f32(Some(location), x, y, z, w),
                _ => log::warn!("Ignoring float uniform with {} components", values.len()),
            }
        }
    }

    fn uniform_mat4(&self, location: &glow::UniformLocation, columns: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(location), false, columns) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { HasContext::draw_elements(self, mode, count, element_type, offset) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }
}
