//! Typed handles over driver-owned OpenGL objects, and the [`Graphics`] trait every component
//! issues its calls through.
//!
//! OpenGL keeps almost all of its state ambiently: the current context, the bound vertex array,
//! the bound buffer and the program in use are all hidden machine state. Rather than sprinkle
//! `unsafe { gl::... }` calls across the codebase, every part of the demo receives a `&impl
//! Graphics` and talks to the driver through it. [`GlContext`](super::opengl::GlContext) is the
//! real implementation; the tests use a recording mock instead, which is what lets the shader
//! builder, the geometry upload and the render loop be checked without a GPU.
//!
//! The handles are deliberately not `Clone` and are deleted by consuming calls, so each one can
//! only ever receive a single delete.

/// The two programmable stages this demo compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlShaderType {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize,
}

impl GlShaderType {
    pub fn gl_enum(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            GlShaderType::Vertex => "vertex",
            GlShaderType::Fragment => "fragment",
        }
    }
}

/// A compiled (or failed) shader object. Only lives until its program is linked.
#[derive(Debug, PartialEq, Eq)]
pub struct GlShader {
    id: u32,
    kind: GlShaderType,
}

impl GlShader {
    pub(crate) fn new(id: u32, kind: GlShaderType) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn kind(&self) -> GlShaderType { self.kind }

    pub fn delete<G: Graphics>(self, gl: &G) {
        gl.delete_shader(self.id);
    }
}

/// Represents the linked graphics pipeline.
#[derive(Debug, PartialEq, Eq)]
pub struct GlProgram {
    id: u32,
}

impl GlProgram {
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn set_used<G: Graphics>(&self, gl: &G) {
        gl.use_program(self.id);
    }

    pub fn delete<G: Graphics>(self, gl: &G) {
        gl.delete_program(self.id);
    }
}

/// A vertex array object: the recorded attribute layout of a vertex buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct GlVertexArray {
    id: u32,
}

impl GlVertexArray {
    pub fn generate<G: Graphics>(gl: &G) -> Self {
        Self { id: gl.gen_vertex_array() }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn bind<G: Graphics>(&self, gl: &G) {
        gl.bind_vertex_array(self.id);
    }

    pub fn clear_binding<G: Graphics>(gl: &G) {
        gl.bind_vertex_array(0);
    }

    pub fn delete<G: Graphics>(self, gl: &G) {
        gl.delete_vertex_array(self.id);
    }
}

/// Represents a [vertex buffer object (VBO)](vbo), the vertex data that's sent to the graphics
/// card.
///
/// [vbo]: https://en.wikipedia.org/wiki/Vertex_buffer_object
#[derive(Debug, PartialEq, Eq)]
pub struct GlVertexBuffer {
    id: u32,
}

impl GlVertexBuffer {
    pub fn generate<G: Graphics>(gl: &G) -> Self {
        Self { id: gl.gen_buffer() }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn bind<G: Graphics>(&self, gl: &G) {
        gl.bind_array_buffer(self.id);
    }

    pub fn clear_binding<G: Graphics>(gl: &G) {
        gl.bind_array_buffer(0);
    }

    pub fn delete<G: Graphics>(self, gl: &G) {
        gl.delete_buffer(self.id);
    }
}

/// The subset of OpenGL this program uses. Every method maps onto one (or, for the info log
/// queries, a couple of) driver calls and assumes the context is current on this thread.
pub trait Graphics {
    fn create_shader(&self, kind: GlShaderType) -> u32;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    /// Reads at most `capacity` bytes of the info log, including the terminator.
    fn shader_info_log(&self, shader: u32, capacity: usize) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    /// Reads at most `capacity` bytes of the info log, including the terminator.
    fn program_info_log(&self, program: u32, capacity: usize) -> String;
    fn use_program(&self, program: u32);
    fn delete_program(&self, program: u32);

    fn gen_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vao: u32);
    fn delete_vertex_array(&self, vao: u32);

    fn gen_buffer(&self) -> u32;
    fn bind_array_buffer(&self, vbo: u32);
    /// Uploads `data` into the bound array buffer with the `STATIC_DRAW` hint.
    fn buffer_data_static(&self, data: &[f32]);
    fn delete_buffer(&self, vbo: u32);

    /// Declares a tightly packed, non-normalized float attribute at offset 0.
    fn vertex_attrib_pointer(&self, index: u32, components: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_color_buffer(&self);
    fn set_wireframe(&self, enabled: bool);
    fn draw_triangles(&self, first: i32, count: i32);
}
