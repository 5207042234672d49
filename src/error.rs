use thiserror::Error;

use crate::graphics::opengl::LoadError;
use crate::graphics::shader::ShaderError;
use crate::window::InitError;

/// Anything that stops the demo before its render loop starts.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

impl AppError {
    /// Process exit status, one per failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Init(e) => e.code(),
            AppError::Load(_) => 5,
            AppError::Shader(_) => 6,
        }
    }
}
