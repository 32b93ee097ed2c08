//! PNG output of rendered views.
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on this
//! crate without pulling in `image`.

use std::path::Path;

use wavefront_core::error::WaveError;
use wavefront_core::view::View;

use crate::pixel::field_to_rgba;

/// Writes an RGBA8 buffer of `width * height` pixels as a PNG.
///
/// # Errors
///
/// `WaveError::InvalidDimensions` if a dimension overflows `u32`,
/// `WaveError::DimensionMismatch` if the buffer length is wrong, or
/// `WaveError::Io` on encode/write failure.
pub fn write_png(pixels: &[u8], width: usize, height: usize, path: &Path) -> Result<(), WaveError> {
    let w = u32::try_from(width).map_err(|_| WaveError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| WaveError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, pixels.to_vec()).ok_or(
        WaveError::DimensionMismatch {
            lhs_w: width,
            lhs_h: height,
            rhs_w: pixels.len() / 4,
            rhs_h: 1,
        },
    )?;
    img.save(path).map_err(|e| WaveError::Io(e.to_string()))?;
    tracing::debug!(path = %path.display(), width, height, "snapshot written");
    Ok(())
}

/// Writes the last rendered frame of `view` as a PNG.
pub fn write_view_png(view: &dyn View, path: &Path) -> Result<(), WaveError> {
    let field = view.field();
    let pixels = field_to_rgba(field, &view.mapper());
    write_png(&pixels, field.width(), field.height(), path)
}
