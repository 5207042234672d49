//! The frame loop and the teardown that follows it.

use std::convert::TryFrom;

use crate::graphics::gl_types::{GlProgram, GlVertexArray, GlVertexBuffer, Graphics};
use crate::window::Surface;

pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

/// The GPU objects drawn every frame. Created once before the loop, deleted once after it.
pub struct Scene {
    pub program: GlProgram,
    pub vertex_array: GlVertexArray,
    pub vertex_buffer: GlVertexBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

impl LoopState {
    /// Closing is terminal; otherwise the close flag decides.
    pub fn next(self, close_requested: bool) -> Self {
        match self {
            LoopState::Closing => LoopState::Closing,
            LoopState::Running if close_requested => LoopState::Closing,
            LoopState::Running => LoopState::Running,
        }
    }
}

/// Asks the window to close when escape is held. Takes effect at the next loop check.
pub fn process_input<S: Surface>(surface: &mut S) {
    if surface.escape_pressed() {
        surface.set_should_close(true);
    }
}

/// Points the viewport at the whole framebuffer. Sizes past `i32::MAX` saturate.
pub fn resize_viewport<G: Graphics>(gl: &G, width: u32, height: u32) {
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);
    gl.viewport(0, 0, width, height);
}

/// Matches the viewport to the surface's framebuffer, which on HiDPI displays is larger than
/// the requested window size.
pub fn sync_viewport<S: Surface, G: Graphics>(surface: &S, gl: &G) {
    let (width, height) = surface.framebuffer_size();
    resize_viewport(gl, width, height);
}

/// Outline-only rendering, set once before the loop.
pub fn set_wireframe<G: Graphics>(gl: &G, wireframe: bool) {
    if wireframe {
        gl.set_wireframe(true);
    }
}

pub fn draw<G: Graphics>(gl: &G, scene: &Scene) {
    let [r, g, b, a] = CLEAR_COLOR;
    gl.clear_color(r, g, b, a);
    gl.clear_color_buffer();

    scene.program.set_used(gl);
    scene.vertex_array.bind(gl);
    gl.draw_triangles(0, 3);
}

/// Renders until the surface asks to close, then tears everything down. Returns the number of
/// frames drawn.
pub fn run<S: Surface, G: Graphics>(mut surface: S, gl: &G, scene: Scene) -> usize {
    let mut state = LoopState::Running;
    let mut frames = 0;

    loop {
        state = state.next(surface.should_close());
        if state == LoopState::Closing {
            break;
        }

        process_input(&mut surface);
        draw(gl, &scene);
        surface.swap_buffers();
        surface.poll_events(&mut |width: u32, height: u32| resize_viewport(gl, width, height));

        frames += 1;
    }

    log::debug!("Render loop exited after {} frames", frames);
    teardown(surface, gl, scene);

    frames
}

/// Deletes every GPU object, then the window.
pub fn teardown<S: Surface, G: Graphics>(surface: S, gl: &G, scene: Scene) {
    let Scene { program, vertex_array, vertex_buffer } = scene;

    vertex_array.delete(gl);
    vertex_buffer.delete(gl);
    program.delete(gl);

    surface.terminate();
}
