//! A small set of wrappers around the OpenGL API.
//!
//! All I need to do is draw one triangle, so there's no rendering library here, just the handful
//! of raw calls that takes, wrapped behind the [`Graphics`](gl_types::Graphics) trait so the rest
//! of the program (and its tests) never touches `unsafe` directly.

pub mod debug;
pub mod geometry;
pub mod gl_types;
pub mod opengl;
pub mod shader;
pub mod utils;

#[cfg(test)]
pub mod mock;
