//! Core error type shared by the scene walk and the program backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The program exposes no uniform with this name.
    #[error("missing uniform location: {0}")]
    MissingUniform(String),
    #[error("uniform {name} expects a {expected} value")]
    UniformType { name: String, expected: &'static str },
    #[error("frame exceeded the draw budget of {0} objects")]
    TooManyDraws(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
