#![deny(unsafe_code)]
//! View registry, animation driver, and CPU-side rendering.
//!
//! This crate sits between `wavefront-core` (which defines the `View` trait
//! and the field evaluator) and the front ends. Both the CLI and the WASM
//! bindings depend on it so view dispatch, the frame loop, and the gain
//! probe live in one place.

pub mod driver;
pub mod gain;
pub mod grid;
pub mod pixel;
pub mod wave;

#[cfg(feature = "png")]
pub mod snapshot;

pub use driver::{AnimationDriver, DriverState, FrameHandle, FrameOutcome, FrameScheduler};
pub use gain::GainMapSnapshot;
pub use wave::AnimatedView;

use wavefront_core::color::ColorMapper;
use wavefront_core::error::WaveError;
use wavefront_core::field::Field;
use wavefront_core::region::ViewRegion;
use wavefront_core::simulation::SimulationContext;
use wavefront_core::View;

/// All available view names.
const VIEW_NAMES: &[&str] = &["wave", "gain"];

/// Enumeration of the rendered views.
///
/// Use [`ViewKind::from_name`] for string-based construction (CLI, WASM).
pub enum ViewKind {
    /// Time-animated instantaneous amplitude.
    Wave(AnimatedView),
    /// Steady-state gain map.
    Gain(GainMapSnapshot),
}

impl ViewKind {
    /// Constructs a view by name, sized for `region`.
    ///
    /// Returns `WaveError::UnknownView` if the name is not recognized.
    pub fn from_name(name: &str, region: &ViewRegion) -> Result<Self, WaveError> {
        let (w, h) = (region.pixel_width(), region.pixel_height());
        match name {
            "wave" => Ok(ViewKind::Wave(AnimatedView::new(w, h)?)),
            "gain" => Ok(ViewKind::Gain(GainMapSnapshot::new(w, h)?)),
            _ => Err(WaveError::UnknownView(name.to_string())),
        }
    }

    /// Returns a slice of all recognized view names.
    pub fn list_views() -> &'static [&'static str] {
        VIEW_NAMES
    }

    /// RGBA8 pixels of the last rendered frame.
    pub fn pixels(&self) -> Vec<u8> {
        match self {
            ViewKind::Wave(v) => pixel::field_to_rgba(v.field(), &v.mapper()),
            ViewKind::Gain(v) => v.pixels().to_vec(),
        }
    }

    /// Gain in decibels at a pixel; only the gain view can be probed.
    pub fn probe(&self, px: usize, py: usize) -> Option<f64> {
        match self {
            ViewKind::Wave(_) => None,
            ViewKind::Gain(v) => v.probe(px, py),
        }
    }
}

impl View for ViewKind {
    fn name(&self) -> &'static str {
        match self {
            ViewKind::Wave(v) => v.name(),
            ViewKind::Gain(v) => v.name(),
        }
    }

    fn render(&mut self, ctx: &SimulationContext) -> Result<(), WaveError> {
        match self {
            ViewKind::Wave(v) => v.render(ctx),
            ViewKind::Gain(v) => v.render(ctx),
        }
    }

    fn field(&self) -> &Field {
        match self {
            ViewKind::Wave(v) => v.field(),
            ViewKind::Gain(v) => v.field(),
        }
    }

    fn mapper(&self) -> ColorMapper {
        match self {
            ViewKind::Wave(v) => v.mapper(),
            ViewKind::Gain(v) => v.mapper(),
        }
    }

    fn is_animated(&self) -> bool {
        match self {
            ViewKind::Wave(v) => v.is_animated(),
            ViewKind::Gain(v) => v.is_animated(),
        }
    }
}
