//! A [`Graphics`] backend that records every call instead of talking to a driver.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::gl_types::{GlShaderType, Graphics};

/// Marker a shader source must contain for the mock compiler to reject it.
pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    GenVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    GenBuffer(u32),
    BindArrayBuffer(u32),
    BufferData(u32),
    DeleteBuffer(u32),
    VertexAttribPointer(u32, i32),
    EnableVertexAttribArray(u32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    Wireframe(bool),
    DrawTriangles(i32, i32),
}

#[derive(Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    sources: RefCell<Vec<(u32, String)>>,
    failed_shaders: RefCell<Vec<u32>>,
    fail_link: Cell<bool>,
    failed_programs: RefCell<Vec<u32>>,
    bound_vao: Cell<u32>,
    bound_buffer: Cell<u32>,
    current_program: Cell<u32>,
    buffers: RefCell<HashMap<u32, Vec<f32>>>,
    draws: RefCell<Vec<(u32, u32)>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn fail_next_link(&self) {
        self.fail_link.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, f: F) -> usize {
        self.calls.borrow().iter().filter(|c| f(c)).count()
    }

    pub fn position<F: Fn(&Call) -> bool>(&self, f: F) -> Option<usize> {
        self.calls.borrow().iter().position(|c| f(c))
    }

    pub fn positions<F: Fn(&Call) -> bool>(&self, f: F) -> Vec<usize> {
        self.calls.borrow().iter()
            .enumerate()
            .filter(|(_, c)| f(c))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn sources(&self) -> Vec<String> {
        self.sources.borrow().iter().map(|(_, s)| s.clone()).collect()
    }

    /// Reads back what was uploaded to a buffer, like `glGetBufferSubData` would.
    pub fn buffer_contents(&self, vbo: u32) -> Option<Vec<f32>> {
        self.buffers.borrow().get(&vbo).cloned()
    }

    pub fn bound_vertex_array(&self) -> u32 {
        self.bound_vao.get()
    }

    pub fn bound_array_buffer(&self) -> u32 {
        self.bound_buffer.get()
    }

    pub fn draws_with_program(&self, program: u32) -> usize {
        self.draws.borrow().iter().filter(|(p, _)| *p == program).count()
    }

    pub fn draws_with_vertex_array(&self, vao: u32) -> usize {
        self.draws.borrow().iter().filter(|(_, v)| *v == vao).count()
    }
}

impl Graphics for RecordingGl {
    fn create_shader(&self, _kind: GlShaderType) -> u32 {
        let id = self.allocate();
        self.record(Call::CreateShader(id));
        id
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.sources.borrow_mut().push((shader, source.to_owned()));
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        let broken = self.sources.borrow().iter()
            .any(|(id, src)| *id == shader && src.contains(SYNTAX_ERROR));
        if broken {
            self.failed_shaders.borrow_mut().push(shader);
        }
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        !self.failed_shaders.borrow().contains(&shader)
    }

    fn shader_info_log(&self, shader: u32, _capacity: usize) -> String {
        if self.shader_compile_status(shader) {
            return String::new();
        }
        // Longer than any buffer the builder hands out
        format!("0:2(42): error: syntax error, unexpected IDENTIFIER\n{}", "x".repeat(1024))
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> u32 {
        let id = self.allocate();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        if self.fail_link.replace(false) {
            self.failed_programs.borrow_mut().push(program);
        }
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        !self.failed_programs.borrow().contains(&program)
    }

    fn program_info_log(&self, program: u32, _capacity: usize) -> String {
        if self.program_link_status(program) {
            return String::new();
        }
        format!("error: linking with uncompiled shader\n{}", "y".repeat(1024))
    }

    fn use_program(&self, program: u32) {
        self.current_program.set(program);
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn gen_vertex_array(&self) -> u32 {
        let id = self.allocate();
        self.record(Call::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.bound_vao.set(vao);
        self.record(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.record(Call::DeleteVertexArray(vao));
    }

    fn gen_buffer(&self) -> u32 {
        let id = self.allocate();
        self.record(Call::GenBuffer(id));
        id
    }

    fn bind_array_buffer(&self, vbo: u32) {
        self.bound_buffer.set(vbo);
        self.record(Call::BindArrayBuffer(vbo));
    }

    fn buffer_data_static(&self, data: &[f32]) {
        let vbo = self.bound_buffer.get();
        self.buffers.borrow_mut().insert(vbo, data.to_vec());
        self.record(Call::BufferData(vbo));
    }

    fn delete_buffer(&self, vbo: u32) {
        self.record(Call::DeleteBuffer(vbo));
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32) {
        self.record(Call::VertexAttribPointer(index, components));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn set_wireframe(&self, enabled: bool) {
        self.record(Call::Wireframe(enabled));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.draws.borrow_mut().push((self.current_program.get(), self.bound_vao.get()));
        self.record(Call::DrawTriangles(first, count));
    }
}
