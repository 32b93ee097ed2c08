//! The steady-state gain map and its pointer probe.
//!
//! The gain map has no time dependency, so it is computed once per
//! parameter change and kept as both display values and an RGBA8 buffer.
//! The probe reads the rendered buffer back through the inverse color map.

use wavefront_core::color::ColorMapper;
use wavefront_core::error::WaveError;
use wavefront_core::evaluator::EvaluationMode;
use wavefront_core::field::Field;
use wavefront_core::simulation::SimulationContext;
use wavefront_core::view::View;

use crate::grid::evaluate_grid;
use crate::pixel::{field_to_rgba, rgb_at};

/// Time-averaged intensity view with its rendered pixels.
pub struct GainMapSnapshot {
    mapper: ColorMapper,
    field: Field,
    pixels: Vec<u8>,
}

impl GainMapSnapshot {
    /// An empty (minimum gain) snapshot using the decibel scale.
    pub fn new(width: usize, height: usize) -> Result<Self, WaveError> {
        Self::with_mapper(width, height, ColorMapper::gain_decibel())
    }

    /// An empty snapshot rendered with `mapper`.
    pub fn with_mapper(width: usize, height: usize, mapper: ColorMapper) -> Result<Self, WaveError> {
        let field = Field::new(width, height)?;
        let pixels = field_to_rgba(&field, &mapper);
        Ok(Self {
            mapper,
            field,
            pixels,
        })
    }

    /// Computes the snapshot for the context's current sources.
    pub fn compute(ctx: &SimulationContext, mapper: ColorMapper) -> Result<Self, WaveError> {
        let region = ctx.region();
        let mut snapshot = Self::with_mapper(region.pixel_width(), region.pixel_height(), mapper)?;
        snapshot.render(ctx)?;
        Ok(snapshot)
    }

    /// RGBA8 buffer, row 0 at the top.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Gain in decibels at pixel `(px, py)`, decoded from the rendered color.
    ///
    /// `None` outside the map or when the mapper is not invertible.
    pub fn probe(&self, px: usize, py: usize) -> Option<f64> {
        let rgb = rgb_at(&self.pixels, self.field.width(), px, py)?;
        self.mapper.probe(rgb)
    }
}

impl View for GainMapSnapshot {
    fn name(&self) -> &'static str {
        "gain"
    }

    fn render(&mut self, ctx: &SimulationContext) -> Result<(), WaveError> {
        let field = evaluate_grid(ctx, EvaluationMode::SteadyState, &self.mapper)?;
        self.pixels = field_to_rgba(&field, &self.mapper);
        self.field = field;
        tracing::debug!(
            width = self.field.width(),
            height = self.field.height(),
            sources = ctx.sources().len(),
            "gain snapshot recomputed"
        );
        Ok(())
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn mapper(&self) -> ColorMapper {
        self.mapper
    }

    fn is_animated(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;
    use wavefront_core::params::ArrayParameters;
    use wavefront_core::region::ViewRegion;
    use wavefront_core::source::Source;

    fn context(sources: Vec<Source>) -> SimulationContext {
        // one pixel per meter, row 10 is y = 0
        let region = ViewRegion::new(40, 20, 40.0).unwrap();
        let params = ArrayParameters::fixed(sources, 1.0, TAU, TAU);
        SimulationContext::new(params, region).unwrap()
    }

    #[test]
    fn new_snapshot_is_at_minimum_gain() {
        let snap = GainMapSnapshot::new(4, 4).unwrap();
        assert_eq!(snap.pixels().len(), 64);
        assert_eq!(snap.probe(0, 0), Some(-80.0));
        assert!(!snap.is_animated());
    }

    #[test]
    fn probe_recovers_single_source_gain() {
        let ctx = context(vec![Source::new(10.0, 0.0, 0.0)]);
        let snap = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel()).unwrap();
        // pixel (20, 10) is 10 m away: |Σ| = 0.1, i.e. -20 dB
        let db = snap.probe(20, 10).unwrap();
        assert!((db - -20.0).abs() < 0.33, "probe gave {db}");
    }

    #[test]
    fn probe_reads_scale_endpoints_around_a_source() {
        let ctx = context(vec![Source::new(10.0, 0.0, 0.0)]);
        let snap = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel()).unwrap();
        // on the source the term is skipped; 1 m away |Σ| = 1
        assert_eq!(snap.probe(10, 10), Some(-80.0));
        assert_eq!(snap.probe(11, 10), Some(0.0));
        assert_eq!(snap.probe(10, 11), Some(0.0));
    }

    #[test]
    fn probe_out_of_bounds_is_none() {
        let snap = GainMapSnapshot::new(4, 4).unwrap();
        assert_eq!(snap.probe(4, 0), None);
        assert_eq!(snap.probe(0, 4), None);
    }

    #[test]
    fn linear_mapper_is_not_probeable() {
        let ctx = context(vec![Source::new(10.0, 0.0, 0.0)]);
        let snap = GainMapSnapshot::compute(&ctx, ColorMapper::GainLinear).unwrap();
        assert_eq!(snap.probe(20, 10), None);
    }

    #[test]
    fn snapshot_is_time_independent() {
        let mut ctx = context(vec![Source::new(10.0, -1.0, 0.0), Source::new(10.0, 1.0, 0.3)]);
        let early = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel()).unwrap();
        ctx.set_time(12.75).unwrap();
        let late = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel()).unwrap();
        assert_eq!(early.pixels(), late.pixels());
    }

    #[test]
    fn pixels_follow_field() {
        let ctx = context(vec![Source::new(10.0, 0.0, 0.0)]);
        let snap = GainMapSnapshot::compute(&ctx, ColorMapper::gain_decibel()).unwrap();
        assert_eq!(snap.pixels(), field_to_rgba(snap.field(), &snap.mapper()).as_slice());
    }
}
