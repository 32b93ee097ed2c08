//! Error types for the wavefront core.

use thiserror::Error;

/// Errors produced while configuring, evaluating, or rendering a wave field.
#[derive(Debug, Error)]
pub enum WaveError {
    /// Width or height was zero when creating a Field, region, or canvas.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A simulation parameter was rejected before the source array was built.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Two buffers had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A frame evaluation produced a NaN or infinite sample at pixel (x, y).
    #[error("non-finite field sample at pixel ({x}, {y})")]
    NonFiniteSample { x: usize, y: usize },

    /// The rendering backend could not be initialized (context, shader compile, link).
    #[error("rendering backend failed to initialize: {0}")]
    BackendInit(String),

    /// A view name passed to the registry was not recognized.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl WaveError {
    /// Shorthand for [`WaveError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        WaveError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
