//! RGBA8 pixel buffers from display fields.
//!
//! Always available (no feature gate) so the PNG snapshot, the gain probe,
//! and the WASM `ImageData` path all share one conversion.

use wavefront_core::color::ColorMapper;
use wavefront_core::field::Field;

/// Maps every display value through `mapper` into `[r, g, b, 255]`.
///
/// The buffer is row-major with row 0 at the top, `width * height * 4` bytes.
pub fn field_to_rgba(field: &Field, mapper: &ColorMapper) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&v| {
            let [r, g, b] = mapper.color(v);
            [r, g, b, 255u8]
        })
        .collect()
}

/// The `[r, g, b]` of pixel `(px, py)` in an RGBA8 buffer of the given width.
///
/// `None` when the pixel lies outside the buffer.
pub fn rgb_at(pixels: &[u8], width: usize, px: usize, py: usize) -> Option<[u8; 3]> {
    if px >= width {
        return None;
    }
    let offset = py.checked_mul(width)?.checked_add(px)?.checked_mul(4)?;
    let rgba = pixels.get(offset..offset.checked_add(4)?)?;
    Some([rgba[0], rgba[1], rgba[2]])
}
