//! Mapping between pixel coordinates and physical coordinates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::WaveError;

/// Default canvas width in pixels.
pub const DEFAULT_PIXEL_WIDTH: usize = 640;
/// Default canvas height in pixels.
pub const DEFAULT_PIXEL_HEIGHT: usize = 360;
/// Default width of the visible area in meters.
pub const DEFAULT_VIEW_WIDTH: f64 = 40.0;

/// The rectangle of the simulated plane shown on a canvas.
///
/// `x` grows rightward from the left edge; `y` is zero at the vertical
/// center and grows upward. Both axes share the scale
/// `view_width / pixel_width` meters per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionFields")]
pub struct ViewRegion {
    pixel_width: usize,
    pixel_height: usize,
    view_width: f64,
}

/// Unchecked wire form; deserialization goes through [`ViewRegion::new`].
#[derive(Deserialize)]
struct RegionFields {
    pixel_width: usize,
    pixel_height: usize,
    view_width: f64,
}

impl TryFrom<RegionFields> for ViewRegion {
    type Error = WaveError;

    fn try_from(raw: RegionFields) -> Result<Self, Self::Error> {
        ViewRegion::new(raw.pixel_width, raw.pixel_height, raw.view_width)
    }
}

impl ViewRegion {
    /// Creates a region, rejecting empty canvases and non-positive view widths.
    pub fn new(pixel_width: usize, pixel_height: usize, view_width: f64) -> Result<Self, WaveError> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(WaveError::InvalidDimensions);
        }
        pixel_width
            .checked_mul(pixel_height)
            .ok_or(WaveError::InvalidDimensions)?;
        if !view_width.is_finite() || view_width <= 0.0 {
            return Err(WaveError::invalid_parameter(
                "view_width",
                format!("must be a positive finite number, got {view_width}"),
            ));
        }
        Ok(Self {
            pixel_width,
            pixel_height,
            view_width,
        })
    }

    pub fn pixel_width(&self) -> usize {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> usize {
        self.pixel_height
    }

    /// Width of the visible area in meters.
    pub fn view_width(&self) -> f64 {
        self.view_width
    }

    /// Physical position of pixel `(px, py)`.
    pub fn to_physical(&self, px: f64, py: f64) -> DVec2 {
        let w = self.pixel_width as f64;
        let h = self.pixel_height as f64;
        DVec2::new(
            px / w * self.view_width,
            (h / 2.0 - py) / w * self.view_width,
        )
    }
}

impl Default for ViewRegion {
    fn default() -> Self {
        Self {
            pixel_width: DEFAULT_PIXEL_WIDTH,
            pixel_height: DEFAULT_PIXEL_HEIGHT,
            view_width: DEFAULT_VIEW_WIDTH,
        }
    }
}
