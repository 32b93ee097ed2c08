#![deny(unsafe_code)]
//! Core types for the wavefront phased-array renderer.
//!
//! Provides the `SourceArray` builder, the `FieldEvaluator` for
//! instantaneous and steady-state superposition, the `ViewRegion`
//! pixel mapping, the invertible gain color scale, the `Field` display
//! grid, the `View` trait, `SimulationContext`, `Scene`, and parameter
//! helpers.

pub mod color;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod params;
pub mod region;
pub mod scene;
pub mod simulation;
pub mod source;
pub mod view;

#[cfg(feature = "render")]
pub mod render;

pub use color::{ColorMapper, GainColorScale, Srgb};
pub use error::WaveError;
pub use evaluator::{EvaluationMode, FieldEvaluator, WaveConstants};
pub use field::Field;
pub use params::{ArrayParameters, ControlValues};
pub use region::ViewRegion;
pub use scene::Scene;
pub use simulation::{FrameUniforms, SimulationContext};
pub use source::{ArrayLayout, Source, SourceArray};
pub use view::View;
