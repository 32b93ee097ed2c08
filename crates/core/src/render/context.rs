//! GPU context wrapper with capability detection.
//!
//! The wave programs keep the whole source list in a fragment-shader uniform
//! array, so the context checks at startup that the driver offers enough
//! fragment uniform vectors for [`MAX_SOURCES`] slots.

use crate::error::WaveError;

use super::program::MAX_SOURCES;

/// Uniform vectors used besides the source array, counting every scalar
/// and `vec2` as a full vector.
const SCALAR_UNIFORM_VECTORS: i32 = 12;

/// Fragment uniform vectors a wave program needs.
pub const fn required_uniform_vectors() -> i32 {
    MAX_SOURCES as i32 + SCALAR_UNIFORM_VECTORS
}

/// Wraps a `glow::Context` together with the limits the wave programs rely on.
pub struct GpuContext {
    gl: glow::Context,
}

impl GpuContext {
    /// Wraps `gl` after checking its fragment uniform budget.
    ///
    /// # Errors
    ///
    /// `WaveError::BackendInit` if the driver cannot hold the source array.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, WaveError> {
        use glow::HasContext;

        // SAFETY: querying an implementation limit has no side effects.
        let max_fragment_uniform_vectors =
            unsafe { gl.get_parameter_i32(glow::MAX_FRAGMENT_UNIFORM_VECTORS) };

        let required = required_uniform_vectors();
        if max_fragment_uniform_vectors < required {
            return Err(WaveError::BackendInit(format!(
                "fragment shaders allow {max_fragment_uniform_vectors} uniform vectors, \
                 {required} are needed for {MAX_SOURCES} sources"
            )));
        }

        tracing::debug!(max_fragment_uniform_vectors, "GPU context ready");
        Ok(Self { gl })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}
