use thiserror::Error;

use super::gl_types::{GlProgram, GlShader, GlShaderType, Graphics};
use super::utils::{bounded_log, INFO_LOG_CAPACITY};

pub const TRIANGLE_VERT: &str = include_str!("shaders/triangle.vert");
pub const TRIANGLE_FRAG: &str = include_str!("shaders/triangle.frag");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("{} shader failed to compile: {}", .kind.name(), .log)]
    Compile { kind: GlShaderType, log: String },
    #[error("program failed to link: {}", .log)]
    Link { log: String },
}

/// Creates a shader of the given kind from a single source string and compiles it.
///
/// On failure the shader object is deleted and the (bounded) info log is returned.
pub fn compile_shader<G: Graphics>(gl: &G, source: &str, kind: GlShaderType) -> Result<GlShader, ShaderError> {
    let shader = GlShader::new(gl.create_shader(kind), kind);
    log::debug!("Created {} shader", kind.name());

    gl.shader_source(shader.id(), source);
    log::debug!("Bound {} shader source", kind.name());

    gl.compile_shader(shader.id());

    if !gl.shader_compile_status(shader.id()) {
        let log = bounded_log(&gl.shader_info_log(shader.id(), INFO_LOG_CAPACITY), INFO_LOG_CAPACITY);
        log::error!("Shader processing failed: {}", log);
        shader.delete(gl);

        return Err(ShaderError::Compile { kind, log });
    }

    log::debug!("Compiled {} shader", kind.name());
    Ok(shader)
}

/// Links the given shaders into a program. The shaders are always deleted afterwards: once
/// linked the program no longer needs them, and a failed program is deleted along with them.
pub fn link_program<G: Graphics>(gl: &G, shaders: Vec<GlShader>) -> Result<GlProgram, ShaderError> {
    let program = GlProgram::new(gl.create_program());

    for shader in &shaders {
        gl.attach_shader(program.id(), shader.id());
        log::debug!("Attached {} shader", shader.kind().name());
    }

    gl.link_program(program.id());
    log::debug!("Linked shader program");

    let linked = gl.program_link_status(program.id());
    let log = if linked {
        None
    } else {
        Some(bounded_log(&gl.program_info_log(program.id(), INFO_LOG_CAPACITY), INFO_LOG_CAPACITY))
    };

    for shader in shaders {
        shader.delete(gl);
    }
    log::debug!("Shader objects deleted");

    match log {
        None => Ok(program),
        Some(log) => {
            log::error!("Program processing failed: {}", log);
            program.delete(gl);
            Err(ShaderError::Link { log })
        }
    }
}

/// Compiles a vertex and a fragment shader and links them into a program.
pub fn build_program<G: Graphics>(gl: &G, vertex_src: &str, fragment_src: &str) -> Result<GlProgram, ShaderError> {
    let vertex = compile_shader(gl, vertex_src, GlShaderType::Vertex)?;

    let fragment = match compile_shader(gl, fragment_src, GlShaderType::Fragment) {
        Ok(fragment) => fragment,
        Err(e) => {
            vertex.delete(gl);
            return Err(e);
        }
    };

    link_program(gl, vec![vertex, fragment])
}
