//! The live wavefront view.
//!
//! Evaluates the instantaneous, causality-gated superposition at the
//! context's current time and stores it as grayscale display values.

use wavefront_core::color::ColorMapper;
use wavefront_core::error::WaveError;
use wavefront_core::evaluator::EvaluationMode;
use wavefront_core::field::Field;
use wavefront_core::simulation::SimulationContext;
use wavefront_core::view::View;

use crate::grid::evaluate_grid;

/// Time-animated view of the instantaneous amplitude.
pub struct AnimatedView {
    field: Field,
}

impl AnimatedView {
    /// Creates a view whose first frame is mid-gray (no wave has arrived).
    pub fn new(width: usize, height: usize) -> Result<Self, WaveError> {
        Ok(Self {
            field: Field::filled(width, height, 0.5)?,
        })
    }
}

impl View for AnimatedView {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn render(&mut self, ctx: &SimulationContext) -> Result<(), WaveError> {
        self.field = evaluate_grid(ctx, EvaluationMode::Instantaneous, &ColorMapper::Amplitude)?;
        tracing::trace!(t = ctx.time(), "wave frame evaluated");
        Ok(())
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn mapper(&self) -> ColorMapper {
        ColorMapper::Amplitude
    }
}
