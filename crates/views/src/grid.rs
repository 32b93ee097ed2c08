//! One evaluation pass over the full pixel grid.
//!
//! Rows are evaluated in parallel with rayon when the `parallel` feature is
//! on. Each pixel's source loop is sequential, so the result is identical
//! with or without the feature.

use wavefront_core::color::ColorMapper;
use wavefront_core::error::WaveError;
use wavefront_core::evaluator::{EvaluationMode, FieldEvaluator};
use wavefront_core::field::Field;
use wavefront_core::simulation::SimulationContext;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Raw evaluator output for every pixel, row-major.
///
/// # Errors
///
/// `WaveError::NonFiniteSample` for the first pixel (in row-major order)
/// whose sample is NaN or infinite.
pub fn sample_grid(ctx: &SimulationContext, mode: EvaluationMode) -> Result<Vec<f64>, WaveError> {
    let region = ctx.region();
    let width = region.pixel_width();
    let evaluator = ctx.evaluator(mode);
    let t = ctx.time();

    let mut samples = vec![0.0_f64; width * region.pixel_height()];
    let row_task = |(py, row): (usize, &mut [f64])| {
        fill_row(&evaluator, ctx, py, row, t);
    };

    #[cfg(feature = "parallel")]
    samples.par_chunks_mut(width).enumerate().for_each(row_task);
    #[cfg(not(feature = "parallel"))]
    samples.chunks_mut(width).enumerate().for_each(row_task);

    if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
        return Err(WaveError::NonFiniteSample {
            x: i % width,
            y: i / width,
        });
    }
    Ok(samples)
}

fn fill_row(
    evaluator: &FieldEvaluator<'_>,
    ctx: &SimulationContext,
    py: usize,
    row: &mut [f64],
    t: f64,
) {
    let region = ctx.region();
    for (px, out) in row.iter_mut().enumerate() {
        let point = region.to_physical(px as f64, py as f64);
        *out = evaluator.evaluate(point, t);
    }
}

/// Evaluates the grid and maps every sample to a display value.
pub fn evaluate_grid(
    ctx: &SimulationContext,
    mode: EvaluationMode,
    mapper: &ColorMapper,
) -> Result<Field, WaveError> {
    let region = ctx.region();
    let display = sample_grid(ctx, mode)?
        .into_iter()
        .map(|s| mapper.display_value(s))
        .collect();
    Field::from_data(region.pixel_width(), region.pixel_height(), display)
}
