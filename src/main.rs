#[macro_use] extern crate clap;

pub mod error;
pub mod graphics;
pub mod interface;
pub mod render;
pub mod window;

use std::process;

use error::AppError;
use graphics::debug::LogSink;
use graphics::geometry::{upload_triangle, TRIANGLE};
use graphics::opengl::GlContext;
use graphics::shader::{build_program, TRIANGLE_FRAG, TRIANGLE_VERT};
use interface::cli::{cli_main, Config};
use interface::logging::init_logging;
use render::Scene;

fn run(config: &Config) -> Result<usize, AppError> {
    let window = window::initialize(config)?;

    let mut gl = GlContext::load_with(|symbol| window.get_proc_address(symbol))?;
    gl.install_debug_sink(Box::new(LogSink));
    render::sync_viewport(&window, &gl);

    let program = build_program(&gl, TRIANGLE_VERT, TRIANGLE_FRAG)?;
    let (vertex_array, vertex_buffer) = upload_triangle(&gl, &TRIANGLE);

    render::set_wireframe(&gl, config.wireframe);

    Ok(render::run(window, &gl, Scene { program, vertex_array, vertex_buffer }))
}

fn main() {
    let config = cli_main();
    init_logging(config.log_level.as_deref());

    match run(&config) {
        Ok(frames) => log::info!("Rendered {} frames", frames),
        // Each failure was logged where it happened
        Err(e) => process::exit(e.exit_code()),
    }
}
