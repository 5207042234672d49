//! The real [`Graphics`] backend: raw calls into the `gl` bindings.
//!
//! Obviously, a knowledge of OpenGL is *necessary* to understand any of this. [Learn
//! OpenGL](learnopengl) is the classic set of tutorials this demo follows, and [Rust and OpenGL
//! from scratch](rs-opengl-from-scratch) shows how to put a safe interface over these calls.
//!
//! Every call here assumes the context created by
//! [`initialize`](crate::window::initialize) is current on this thread, which holds for the whole
//! life of the program since it never leaves the main thread.
//!
//! [learnopengl]: https://learnopengl.com/
//! [rs-opengl-from-scratch]: http://nercury.github.io/rust/opengl/tutorial/2018/02/09/opengl-in-rust-from-scratch-02-opengl-context.html

use std::ffi::{c_void, CStr};
use std::mem::size_of;
use std::os::raw::c_char;
use std::ptr::null;

use gl::types::*;
use thiserror::Error;

use super::debug::{debug_callback, DebugSink};
use super::gl_types::{GlShaderType, Graphics};
use super::utils::{create_log_buffer, info_log_from_bytes};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("OpenGL entry point {0} could not be loaded")]
    MissingEntryPoint(&'static str),
}

/// Loaded OpenGL function table, plus the debug sink the driver reports to.
pub struct GlContext {
    // Double boxed so the pointer handed to the driver stays put when `GlContext` moves
    debug_sink: Option<Box<Box<dyn DebugSink>>>,
}

/// Entry points the demo cannot run without.
fn required_entry_points() -> [(&'static str, bool); 29] {
    [
        ("glCreateShader", gl::CreateShader::is_loaded()),
        ("glShaderSource", gl::ShaderSource::is_loaded()),
        ("glCompileShader", gl::CompileShader::is_loaded()),
        ("glGetShaderiv", gl::GetShaderiv::is_loaded()),
        ("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded()),
        ("glDeleteShader", gl::DeleteShader::is_loaded()),
        ("glCreateProgram", gl::CreateProgram::is_loaded()),
        ("glAttachShader", gl::AttachShader::is_loaded()),
        ("glLinkProgram", gl::LinkProgram::is_loaded()),
        ("glGetProgramiv", gl::GetProgramiv::is_loaded()),
        ("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded()),
        ("glUseProgram", gl::UseProgram::is_loaded()),
        ("glDeleteProgram", gl::DeleteProgram::is_loaded()),
        ("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
        ("glBindVertexArray", gl::BindVertexArray::is_loaded()),
        ("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded()),
        ("glGenBuffers", gl::GenBuffers::is_loaded()),
        ("glBindBuffer", gl::BindBuffer::is_loaded()),
        ("glBufferData", gl::BufferData::is_loaded()),
        ("glDeleteBuffers", gl::DeleteBuffers::is_loaded()),
        ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded()),
        ("glEnableVertexAttribArray", gl::EnableVertexAttribArray::is_loaded()),
        ("glClearColor", gl::ClearColor::is_loaded()),
        ("glClear", gl::Clear::is_loaded()),
        ("glPolygonMode", gl::PolygonMode::is_loaded()),
        ("glGetString", gl::GetString::is_loaded()),
        ("glEnable", gl::Enable::is_loaded()),
        ("glDrawArrays", gl::DrawArrays::is_loaded()),
        ("glViewport", gl::Viewport::is_loaded()),
    ]
}

fn gl_string(name: GLenum) -> Option<String> {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return None;
    }

    let s = unsafe { CStr::from_ptr(ptr as *const c_char) };
    Some(s.to_string_lossy().into_owned())
}

impl GlContext {
    /// Resolves every OpenGL entry point through `loader`. Only valid once a context is current.
    pub fn load_with<F>(loader: F) -> Result<Self, LoadError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let missing = required_entry_points().iter()
            .find(|(_, loaded)| !*loaded)
            .map(|(name, _)| *name);

        if let Some(name) = missing {
            log::error!("Failed to load OpenGL: {} is missing", name);
            return Err(LoadError::MissingEntryPoint(name));
        }

        log::info!(
            "Using OpenGL: {} ({})",
            gl_string(gl::VERSION).unwrap_or_else(|| "unknown version".to_owned()),
            gl_string(gl::RENDERER).unwrap_or_else(|| "unknown renderer".to_owned()),
        );

        Ok(Self { debug_sink: None })
    }

    /// Turns on `GL_DEBUG_OUTPUT` and routes every message to `sink`. Debug output stays off
    /// when the driver has no `glDebugMessageCallback`.
    pub fn install_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        if !gl::DebugMessageCallback::is_loaded() {
            log::info!("Debug output unavailable on this driver");
            return;
        }

        let sink = Box::new(sink);
        let user_param = &*sink as *const Box<dyn DebugSink> as *const c_void;

        unsafe {
            gl::Enable(gl::DEBUG_OUTPUT);
            gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
            gl::DebugMessageCallback(Some(debug_callback), user_param);
        }

        self.debug_sink = Some(sink);
        log::debug!("Installed debug message callback");
    }
}

impl Graphics for GlContext {
    fn create_shader(&self, kind: GlShaderType) -> u32 {
        unsafe { gl::CreateShader(kind.gl_enum()) }
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) };
    }

    fn compile_shader(&self, shader: u32) {
        unsafe { gl::CompileShader(shader) };
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: u32, capacity: usize) -> String {
        let mut buf = create_log_buffer(capacity);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(shader, capacity as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }

        buf.truncate(written.max(0) as usize);
        info_log_from_bytes(&buf, capacity)
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&self, program: u32) {
        unsafe { gl::LinkProgram(program) };
    }

    fn program_link_status(&self, program: u32) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: u32, capacity: usize) -> String {
        let mut buf = create_log_buffer(capacity);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(program, capacity as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }

        buf.truncate(written.max(0) as usize);
        info_log_from_bytes(&buf, capacity)
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program) };
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { gl::BindVertexArray(vao) };
    }

    fn delete_vertex_array(&self, vao: u32) {
        unsafe { gl::DeleteVertexArrays(1, &vao) };
    }

    fn gen_buffer(&self) -> u32 {
        let mut vbo = 0;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        vbo
    }

    fn bind_array_buffer(&self, vbo: u32) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, vbo) };
    }

    fn buffer_data_static(&self, data: &[f32]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * size_of::<f32>()) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, vbo: u32) {
        unsafe { gl::DeleteBuffers(1, &vbo) };
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32) {
        unsafe {
            gl::VertexAttribPointer(index, components, gl::FLOAT, gl::FALSE, 0, null());
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::ClearColor(red, green, blue, alpha) };
    }

    fn clear_color_buffer(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
    }

    fn set_wireframe(&self, enabled: bool) {
        let mode = if enabled { gl::LINE } else { gl::FILL };
        unsafe { gl::PolygonMode(gl::FRONT_AND_BACK, mode) };
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) };
    }
}
